//! Line-delimited JSON-RPC 2.0 over stdio, so an editor or site build can
//! ask for outlines without spawning a process per page. Outlines go
//! through the shared [`TocCache`].
//!
//! Methods: `toc/build` (outline of `text`, urls under optional `base`),
//! `toc/anchors` (heading ids of `text`), `ping`.

use std::io::{self, BufRead, Write};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cache::TocCache;
use crate::error::PagetocError;
use crate::toc;

/// Serve stdin until EOF.
pub fn run(cache: &TocCache) -> io::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    serve(stdin.lock(), &mut stdout.lock(), cache)
}

/// Serve requests from `input` until EOF, writing responses to `out`.
pub fn serve(input: impl BufRead, out: &mut impl Write, cache: &TocCache) -> io::Result<()> {
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let req: JsonRpcRequest = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                write_error(out, None, -32700, &format!("parse error: {e}"))?;
                continue;
            }
        };

        // Notifications have no id and get no response
        if req.id.is_none() {
            continue;
        }

        let response = handle_request(&req, cache);
        serde_json::to_writer(&mut *out, &response)?;
        out.write_all(b"\n")?;
        out.flush()?;
    }

    Ok(())
}

#[derive(Deserialize)]
struct JsonRpcRequest {
    #[serde(rename = "jsonrpc")]
    _jsonrpc: String,
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

#[derive(Serialize)]
struct JsonRpcResponse {
    jsonrpc: &'static str,
    id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

#[derive(Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

#[derive(Deserialize)]
struct BuildParams {
    text: String,
    #[serde(default)]
    base: String,
}

#[derive(Deserialize)]
struct AnchorParams {
    text: String,
}

fn handle_request(req: &JsonRpcRequest, cache: &TocCache) -> JsonRpcResponse {
    let result = match req.method.as_str() {
        "ping" => Ok(serde_json::json!({})),
        "toc/build" => toc_build(&req.params, cache),
        "toc/anchors" => toc_anchors(&req.params),
        _ => {
            return error_response(
                req.id.clone(),
                -32601,
                format!("method not found: {}", req.method),
            )
        }
    };

    match result {
        Ok(value) => JsonRpcResponse {
            jsonrpc: "2.0",
            id: req.id.clone(),
            result: Some(value),
            error: None,
        },
        Err(e) => error_response(req.id.clone(), -32602, e.to_string()),
    }
}

fn params<T: DeserializeOwned>(params: &Value) -> Result<T, PagetocError> {
    T::deserialize(params).map_err(|e| PagetocError::InvalidRequest {
        reason: e.to_string(),
    })
}

fn toc_build(raw: &Value, cache: &TocCache) -> Result<Value, PagetocError> {
    let p: BuildParams = params(raw)?;
    let toc = cache.get_or_build(&p.text, &p.base);
    serde_json::to_value(&*toc).map_err(|e| PagetocError::InvalidRequest {
        reason: e.to_string(),
    })
}

fn toc_anchors(raw: &Value) -> Result<Value, PagetocError> {
    let p: AnchorParams = params(raw)?;
    let anchors = toc::heading_anchors(&p.text);
    Ok(serde_json::json!({ "anchors": anchors }))
}

fn error_response(id: Option<Value>, code: i32, message: String) -> JsonRpcResponse {
    JsonRpcResponse {
        jsonrpc: "2.0",
        id,
        result: None,
        error: Some(JsonRpcError { code, message }),
    }
}

fn write_error(w: &mut impl Write, id: Option<Value>, code: i32, msg: &str) -> io::Result<()> {
    let resp = error_response(id, code, msg.into());
    serde_json::to_writer(&mut *w, &resp)?;
    w.write_all(b"\n")?;
    w.flush()
}
