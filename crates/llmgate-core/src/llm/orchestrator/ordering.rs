//! Mode-dependent provider ordering

use crate::llm::messages::GenerationRequest;
use crate::llm::provider_types::ProviderName;
use serde::{Deserialize, Serialize};

/// Which fixed ordering a call uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallMode {
    /// Primary → Secondary → Local
    Interactive,
    /// Local → Secondary → Tertiary; Primary is never called
    Training,
}

impl CallMode {
    pub fn of(request: &GenerationRequest) -> Self {
        if request.options.is_training {
            CallMode::Training
        } else {
            CallMode::Interactive
        }
    }
}

impl std::fmt::Display for CallMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallMode::Interactive => write!(f, "interactive"),
            CallMode::Training => write!(f, "training"),
        }
    }
}

/// Positional provider order for `mode`.
///
/// `local_usable` is the local-service switch in interactive mode and the
/// switch plus a successful availability probe in training mode. Tertiary is
/// only ever reached in training mode.
pub fn select_order(mode: CallMode, local_usable: bool) -> Vec<ProviderName> {
    let mut order = Vec::with_capacity(3);
    match mode {
        CallMode::Interactive => {
            order.push(ProviderName::Primary);
            order.push(ProviderName::Secondary);
            if local_usable {
                order.push(ProviderName::Local);
            }
        }
        CallMode::Training => {
            if local_usable {
                order.push(ProviderName::Local);
            }
            order.push(ProviderName::Secondary);
            order.push(ProviderName::Tertiary);
        }
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use ProviderName::*;

    #[test]
    fn test_interactive_order() {
        assert_eq!(
            select_order(CallMode::Interactive, true),
            vec![Primary, Secondary, Local]
        );
        assert_eq!(
            select_order(CallMode::Interactive, false),
            vec![Primary, Secondary]
        );
    }

    #[test]
    fn test_training_order_never_contains_primary() {
        assert_eq!(
            select_order(CallMode::Training, true),
            vec![Local, Secondary, Tertiary]
        );
        assert_eq!(
            select_order(CallMode::Training, false),
            vec![Secondary, Tertiary]
        );
    }

    #[test]
    fn test_mode_from_request() {
        assert_eq!(
            CallMode::of(&GenerationRequest::new("hi")),
            CallMode::Interactive
        );
        assert_eq!(
            CallMode::of(&GenerationRequest::new("hi").training()),
            CallMode::Training
        );
    }
}
