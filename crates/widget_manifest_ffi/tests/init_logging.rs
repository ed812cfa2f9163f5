use std::ffi::{c_char, CStr, CString};
use std::ptr;
use widget_manifest_ffi::{InitManifestLogging, ReleaseData};

fn init(level: &str, log_dir: &str) -> Result<(), String> {
    let level = CString::new(level).expect("no NUL in level");
    let log_dir = CString::new(log_dir).expect("no NUL in log dir");
    let mut error: *const c_char = ptr::null();
    if unsafe { InitManifestLogging(level.as_ptr(), log_dir.as_ptr(), &mut error) } {
        assert!(error.is_null());
        return Ok(());
    }
    assert!(!error.is_null());
    let message = unsafe { CStr::from_ptr(error) }
        .to_str()
        .expect("UTF-8")
        .to_string();
    assert!(unsafe { ReleaseData(ptr::null(), error) });
    Err(message)
}

#[test]
fn init_logging_starts_once_and_rejects_conflicting_settings() {
    let dir = tempfile::tempdir().expect("temp dir");
    let log_dir = dir.path().join("logs");
    let log_dir = log_dir.to_str().expect("UTF-8 path");

    init("info", log_dir).expect("first init");
    init("INFO", log_dir).expect("identical init is accepted");

    let err = init("debug", log_dir).expect_err("level conflict");
    assert!(err.contains("already initialized"), "{err}");

    let other_dir = dir.path().join("other");
    let err = init("info", other_dir.to_str().expect("UTF-8 path")).expect_err("dir conflict");
    assert!(err.contains("already initialized"), "{err}");

    assert!(std::path::Path::new(log_dir).is_dir());
}
