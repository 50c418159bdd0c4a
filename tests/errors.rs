use std::io;

use pagetoc::PagetocError;

#[test]
fn missing_file_maps_to_not_found() {
    let err = PagetocError::io("docs/none.md", io::Error::from(io::ErrorKind::NotFound));
    assert!(matches!(err, PagetocError::NotFound { .. }));
    assert_eq!(err.to_string(), "docs/none.md not found");
}

#[test]
fn other_io_failures_keep_their_source() {
    let err = PagetocError::io("docs/a.md", io::Error::from(io::ErrorKind::PermissionDenied));
    assert!(matches!(err, PagetocError::Io { .. }));
    assert!(err.to_string().starts_with("docs/a.md: "));
    assert!(std::error::Error::source(&err).is_some());
}
