// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Deterministic ordinal encodings for categorical Redfish states.
//!
//! Each function is total over strings: values inside the closed set get a
//! fixed ordinal, everything else gets `None` and the caller suppresses the
//! sample. The ordinal assignments are part of the metric documentation and
//! must not change between releases.

/// Health: 0: OK, 1: Warning, 2: Critical.
pub fn health(value: &str) -> Option<f64> {
    match value {
        "OK" => Some(0.0),
        "Warning" => Some(1.0),
        "Critical" => Some(2.0),
        _ => None,
    }
}

/// State: 0: Disabled, 1: Enabled, 2: StandbyOffline, 3: StandbySpare,
/// 4: InTest, 5: Starting, 6: Absent, 7: UnavailableOffline, 8: Deferring,
/// 9: Quiesced, 10: Updating.
pub fn state(value: &str) -> Option<f64> {
    match value {
        "Disabled" => Some(0.0),
        "Enabled" => Some(1.0),
        "StandbyOffline" => Some(2.0),
        "StandbySpare" => Some(3.0),
        "InTest" => Some(4.0),
        "Starting" => Some(5.0),
        "Absent" => Some(6.0),
        "UnavailableOffline" => Some(7.0),
        "Deferring" => Some(8.0),
        "Quiesced" => Some(9.0),
        "Updating" => Some(10.0),
        _ => None,
    }
}

/// Power state: 0: Off, 1: On, 2: PoweringOn, 3: PoweringOff.
pub fn power_state(value: &str) -> Option<f64> {
    match value {
        "Off" => Some(0.0),
        "On" => Some(1.0),
        "PoweringOn" => Some(2.0),
        "PoweringOff" => Some(3.0),
        _ => None,
    }
}

/// Intrusion sensor: 0: Normal, 1: HardwareIntrusion, 2: TamperingDetected.
pub fn intrusion_sensor(value: &str) -> Option<f64> {
    match value {
        "Normal" => Some(0.0),
        "HardwareIntrusion" => Some(1.0),
        "TamperingDetected" => Some(2.0),
        _ => None,
    }
}

/// Network port link status: 0: Down, 1: Up.
pub fn port_link_status(value: &str) -> Option<f64> {
    match value {
        "Down" => Some(0.0),
        "Up" => Some(1.0),
        _ => None,
    }
}

/// Ethernet interface link status: 0: LinkDown, 1: LinkUp, 2: NoLink.
pub fn interface_link_status(value: &str) -> Option<f64> {
    match value {
        "LinkDown" => Some(0.0),
        "LinkUp" => Some(1.0),
        "NoLink" => Some(2.0),
        _ => None,
    }
}

/// Drive encryption status: 0: Unencrypted, 1: Unlocked, 2: Locked,
/// 3: Foreign. The schema historically shipped the misspelling "Unecrypted";
/// both spellings are accepted as ordinal 0.
pub fn encryption_status(value: &str) -> Option<f64> {
    match value {
        "Unecrypted" | "Unencrypted" => Some(0.0),
        "Unlocked" => Some(1.0),
        "Locked" => Some(2.0),
        "Foreign" => Some(3.0),
        _ => None,
    }
}

/// Drive hotspare type: 0: None, 1: Global, 2: Chassis, 3: Dedicated.
pub fn hotspare_type(value: &str) -> Option<f64> {
    match value {
        "None" => Some(0.0),
        "Global" => Some(1.0),
        "Chassis" => Some(2.0),
        "Dedicated" => Some(3.0),
        _ => None,
    }
}

/// Drive status indicator: 0: Fail, 1: OK, 2: Rebuild,
/// 3: PredictiveFailureAnalysis, 4: Hotspare, 5: InACriticalArray,
/// 6: InAFailedArray.
pub fn drive_status_indicator(value: &str) -> Option<f64> {
    match value {
        "Fail" => Some(0.0),
        "OK" => Some(1.0),
        "Rebuild" => Some(2.0),
        "PredictiveFailureAnalysis" => Some(3.0),
        "Hotspare" => Some(4.0),
        "InACriticalArray" => Some(5.0),
        "InAFailedArray" => Some(6.0),
        _ => None,
    }
}

/// Boolean gauges: 1 for enabled/true, 0 for disabled/false.
pub fn bool_gauge(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_ordinals() {
        assert_eq!(health("OK"), Some(0.0));
        assert_eq!(health("Warning"), Some(1.0));
        assert_eq!(health("Critical"), Some(2.0));
    }

    #[test]
    fn test_state_ordinals_are_stable() {
        let expected = [
            ("Disabled", 0.0),
            ("Enabled", 1.0),
            ("StandbyOffline", 2.0),
            ("StandbySpare", 3.0),
            ("InTest", 4.0),
            ("Starting", 5.0),
            ("Absent", 6.0),
            ("UnavailableOffline", 7.0),
            ("Deferring", 8.0),
            ("Quiesced", 9.0),
            ("Updating", 10.0),
        ];
        for (value, ordinal) in expected {
            assert_eq!(state(value), Some(ordinal), "state {value}");
        }
    }

    #[test]
    fn test_unknown_values_yield_no_ordinal() {
        let encoders: [fn(&str) -> Option<f64>; 9] = [
            health,
            state,
            power_state,
            intrusion_sensor,
            port_link_status,
            interface_link_status,
            encryption_status,
            hotspare_type,
            drive_status_indicator,
        ];
        for encode in encoders {
            assert_eq!(encode(""), None);
            assert_eq!(encode("Bogus"), None);
            assert_eq!(encode("ok"), None); // case sensitive
        }
    }

    #[test]
    fn test_both_unencrypted_spellings_accepted() {
        assert_eq!(encryption_status("Unencrypted"), Some(0.0));
        assert_eq!(encryption_status("Unecrypted"), Some(0.0));
    }

    #[test]
    fn test_bool_gauge() {
        assert_eq!(bool_gauge(true), 1.0);
        assert_eq!(bool_gauge(false), 0.0);
    }
}
