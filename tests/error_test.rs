use std::time::Duration;

use bragi::{BragiError, Result};

#[test]
fn test_error_display() {
    let err = BragiError::NoModelLoaded {
        endpoint: "http://127.0.0.1:5000".to_string(),
    };
    assert!(err.to_string().contains("http://127.0.0.1:5000"));
}

#[test]
fn test_unreachable_names_endpoint() {
    let err = BragiError::EndpointUnreachable {
        endpoint: "http://127.0.0.1:5001".to_string(),
        reason: "connection refused".to_string(),
    };
    let message = err.to_string();
    assert!(message.contains("http://127.0.0.1:5001"));
    assert!(message.contains("connection refused"));
}

#[test]
fn test_result_alias() {
    fn returns_error() -> Result<()> {
        Err(BragiError::NoCredentials)
    }
    assert!(returns_error().is_err());
}

// ============================================================================
// Transient error classification
// ============================================================================

#[test]
fn transient_errors() {
    assert!(BragiError::RateLimited { retry_after: None }.is_transient());
    assert!(
        BragiError::RateLimited {
            retry_after: Some(Duration::from_secs(1))
        }
        .is_transient()
    );
    assert!(BragiError::Http("connection reset".into()).is_transient());
    assert!(
        BragiError::Api {
            status: 503,
            message: "unavailable".into()
        }
        .is_transient()
    );
    assert!(BragiError::EmptyResult.is_transient());
}

#[test]
fn permanent_errors() {
    assert!(!BragiError::NoCredentials.is_transient());
    assert!(
        !BragiError::EndpointUnreachable {
            endpoint: "x".into(),
            reason: "y".into()
        }
        .is_transient()
    );
    assert!(
        !BragiError::NoModelLoaded {
            endpoint: "x".into()
        }
        .is_transient()
    );
    assert!(
        !BragiError::GenerationTimeout {
            operation: "local generation",
            limit: Duration::from_secs(45)
        }
        .is_transient()
    );
    assert!(
        !BragiError::Api {
            status: 400,
            message: "bad request".into()
        }
        .is_transient()
    );
}

#[test]
fn retry_after_hint_passes_through() {
    let err = BragiError::RateLimited {
        retry_after: Some(Duration::from_secs(7)),
    };
    assert_eq!(err.retry_after(), Some(Duration::from_secs(7)));
    assert_eq!(BragiError::EmptyResult.retry_after(), None);
}
