use crate::dto::HealthRes;

/// Simple health service for the REST API
///
/// This service provides a standardised way to check the health status of the CRMS service.
#[derive(Clone, Copy, Debug)]
pub struct HealthService;

impl HealthService {
    /// Reports the service as alive, naming the model that answers requests.
    pub fn check_health(model: &str) -> HealthRes {
        HealthRes {
            ok: true,
            message: "CRMS is alive".into(),
            model: model.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_health() {
        let res = HealthService::check_health("llama-3.1-70b-versatile");
        assert!(res.ok);
        assert_eq!(res.message, "CRMS is alive");
        assert_eq!(res.model, "llama-3.1-70b-versatile");
    }
}
