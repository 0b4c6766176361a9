use fencefs_core::error::{
    ConfigError, ErrorContext, ExitCode, FenceError, FsError, IntoFenceError, OperationError,
    Result, SecurityError, ValidationError,
};

#[test]
fn invalid_input_maps_to_general_error() {
    let err = FenceError::InvalidInput {
        message: "bad arg".into(),
    };
    let code: ExitCode = (&err).into();
    assert_eq!(code, ExitCode::GeneralError);
}

#[test]
fn security_errors_map_to_security_exit_code() {
    let err: FenceError = SecurityError::PathTraversal {
        raw_input: "../etc".into(),
    }
    .into();
    let code: ExitCode = (&err).into();
    assert_eq!(code, ExitCode::SecurityError);
}

#[test]
fn config_errors_map_to_config_exit_code() {
    let err: FenceError = ConfigError::FileNotFound {
        path: "/tmp/missing.json".into(),
    }
    .into();
    let code: ExitCode = (&err).into();
    assert_eq!(code, ExitCode::ConfigError);
}

#[test]
fn timeout_maps_to_timeout_exit_code() {
    let err = FenceError::Timeout {
        operation: "compute_checksum".into(),
        timeout_ms: 5000,
    };
    let code: ExitCode = (&err).into();
    assert_eq!(code, ExitCode::TimeoutError);
}

#[test]
fn batch_failed_maps_to_blocking_exit_code() {
    let err: FenceError = OperationError::BatchFailed {
        index: 2,
        reason: "disk full".into(),
    }
    .into();
    let code: ExitCode = (&err).into();
    assert_eq!(code, ExitCode::BlockingError);
}

#[test]
fn other_operation_errors_map_to_general_error() {
    let err: FenceError = OperationError::ChecksumMismatch {
        expected: "abc".into(),
        actual: "def".into(),
    }
    .into();
    let code: ExitCode = (&err).into();
    assert_eq!(code, ExitCode::GeneralError);
}

#[test]
fn validation_error_display_includes_field_and_reason() {
    let err = ValidationError::InvalidValue {
        field: "algorithm".into(),
        value: "blake3".into(),
        reason: "unsupported checksum algorithm".into(),
    };
    let text = err.to_string();
    assert!(text.contains("algorithm"));
    assert!(text.contains("blake3"));
}

#[test]
fn fs_error_from_io_classifies_not_found() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    let fs_err = FsError::from_io(&io_err, "/tmp/ghost.txt");
    assert!(matches!(fs_err, FsError::NotFound { path } if path == "/tmp/ghost.txt"));
}

#[test]
fn with_context_preserves_message_and_source() {
    fn parse() -> Result<()> {
        Err(FenceError::InvalidInput {
            message: "bad".into(),
        })
        .with_context(|| "while parsing batch request".to_string())
    }

    let err = parse().unwrap_err();
    let text = err.to_string();
    assert!(text.contains("while parsing batch request"));
}

#[test]
fn into_fence_error_converts_via_from_impl() {
    fn load() -> Result<()> {
        let result: std::result::Result<(), ConfigError> = Err(ConfigError::MissingField {
            field: "policy.workspace_root".into(),
        });
        result.into_fence_error()
    }

    let err = load().unwrap_err();
    assert!(matches!(err, FenceError::Config(ConfigError::MissingField { .. })));
}

#[test]
fn context_error_preserves_wrapped_exit_code() {
    let inner = FenceError::Security(SecurityError::EmergencyStop);
    let wrapped = FenceError::Context {
        message: "admin action failed".into(),
        source: Box::new(inner),
    };
    let code: ExitCode = (&wrapped).into();
    assert_eq!(code, ExitCode::SecurityError);
}
