use serde::Serialize;

use crate::monitor::{TrackEvent, TrackEventKind};

/// Subject/body pair handed to the mail transport.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EmailAlert {
    pub subject: String,
    pub body: String,
}

impl EmailAlert {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Fixed message used to check mail credentials.
    pub fn test_message() -> Self {
        Self::new(
            "You are awesome!",
            "Congrats for sending test email with Mailtrap!",
        )
    }
}

/// Scrolling-log text for an event.
pub fn log_line(event: &TrackEvent) -> String {
    let id = event.track_id;
    match event.kind {
        TrackEventKind::EnteredZone => {
            format!("ALERT! Vehicle ID {} entered the off-road zone.", id)
        }
        TrackEventKind::LeftZone => format!("ALERT! Vehicle ID {} left the off-road zone.", id),
        TrackEventKind::Appeared => format!("INFO: Vehicle ID {} appeared on the screen.", id),
        TrackEventKind::Disappeared => {
            format!("INFO: Vehicle ID {} disappeared from the screen.", id)
        }
    }
}

/// Email for zone transitions; `None` for appear/disappear.
pub fn email_for(event: &TrackEvent) -> Option<EmailAlert> {
    let id = event.track_id;
    match event.kind {
        TrackEventKind::EnteredZone => Some(EmailAlert::new(
            format!("Vehicle ID {} Off-Road Alert", id),
            format!("Vehicle ID {} entered the off-road zone.", id),
        )),
        TrackEventKind::LeftZone => Some(EmailAlert::new(
            format!("Vehicle ID {} Off-Road Exit", id),
            format!("Vehicle ID {} left the off-road zone.", id),
        )),
        TrackEventKind::Appeared | TrackEventKind::Disappeared => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(kind: TrackEventKind) -> TrackEvent {
        TrackEvent {
            frame_index: 12,
            track_id: 42,
            class_id: 2,
            kind,
            zone_id: None,
        }
    }

    #[test]
    fn log_lines_match_operator_wording() {
        assert_eq!(
            log_line(&event(TrackEventKind::EnteredZone)),
            "ALERT! Vehicle ID 42 entered the off-road zone."
        );
        assert_eq!(
            log_line(&event(TrackEventKind::LeftZone)),
            "ALERT! Vehicle ID 42 left the off-road zone."
        );
        assert_eq!(
            log_line(&event(TrackEventKind::Appeared)),
            "INFO: Vehicle ID 42 appeared on the screen."
        );
        assert_eq!(
            log_line(&event(TrackEventKind::Disappeared)),
            "INFO: Vehicle ID 42 disappeared from the screen."
        );
    }

    #[test]
    fn only_zone_transitions_produce_email() {
        let entered = email_for(&event(TrackEventKind::EnteredZone)).unwrap();
        assert_eq!(entered.subject, "Vehicle ID 42 Off-Road Alert");
        assert_eq!(entered.body, "Vehicle ID 42 entered the off-road zone.");

        let left = email_for(&event(TrackEventKind::LeftZone)).unwrap();
        assert_eq!(left.subject, "Vehicle ID 42 Off-Road Exit");
        assert_eq!(left.body, "Vehicle ID 42 left the off-road zone.");

        assert!(email_for(&event(TrackEventKind::Appeared)).is_none());
        assert!(email_for(&event(TrackEventKind::Disappeared)).is_none());
    }
}
