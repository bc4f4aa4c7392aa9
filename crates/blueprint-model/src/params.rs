//! Parameter blocks carried by speakers and other circuit-configurable
//! entities. Each block has game defaults and merges partial updates.

use blueprint_data::schema::{AlertParametersData, CircuitParametersData, SpeakerParametersData};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Circuit parameters
// ---------------------------------------------------------------------------

/// How a speaker turns its circuit signal into a note.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CircuitParameters {
    pub signal_is_pitch: bool,
    pub instrument: u32,
    pub note: u32,
}

impl CircuitParameters {
    /// Overlay the fields present in `patch`.
    pub fn merge(&mut self, patch: &CircuitParametersData) {
        if let Some(v) = patch.signal_value_is_pitch {
            self.signal_is_pitch = v;
        }
        if let Some(v) = patch.instrument_id {
            self.instrument = v;
        }
        if let Some(v) = patch.note_id {
            self.note = v;
        }
    }

    pub fn to_data(&self) -> CircuitParametersData {
        CircuitParametersData {
            signal_value_is_pitch: Some(self.signal_is_pitch),
            instrument_id: Some(self.instrument),
            note_id: Some(self.note),
        }
    }
}

// ---------------------------------------------------------------------------
// Speaker parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerParameters {
    pub volume: f64,
    pub play_globally: bool,
    pub allow_polyphony: bool,
}

impl Default for SpeakerParameters {
    fn default() -> Self {
        Self {
            volume: 1.0,
            play_globally: false,
            allow_polyphony: true,
        }
    }
}

impl SpeakerParameters {
    pub fn merge(&mut self, patch: &SpeakerParametersData) {
        if let Some(v) = patch.playback_volume {
            self.volume = v;
        }
        if let Some(v) = patch.playback_globally {
            self.play_globally = v;
        }
        if let Some(v) = patch.allow_polyphony {
            self.allow_polyphony = v;
        }
    }

    pub fn to_data(&self) -> SpeakerParametersData {
        SpeakerParametersData {
            playback_volume: Some(self.volume),
            playback_globally: Some(self.play_globally),
            allow_polyphony: Some(self.allow_polyphony),
        }
    }
}

// ---------------------------------------------------------------------------
// Alert parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertParameters {
    pub show_alert: bool,
    pub show_on_map: bool,
    pub message: String,
}

impl Default for AlertParameters {
    fn default() -> Self {
        Self {
            show_alert: false,
            show_on_map: true,
            message: String::new(),
        }
    }
}

impl AlertParameters {
    pub fn merge(&mut self, patch: &AlertParametersData) {
        if let Some(v) = patch.show_alert {
            self.show_alert = v;
        }
        if let Some(v) = patch.show_on_map {
            self.show_on_map = v;
        }
        if let Some(v) = &patch.alert_message {
            self.message = v.clone();
        }
    }

    pub fn to_data(&self) -> AlertParametersData {
        AlertParametersData {
            show_alert: Some(self.show_alert),
            show_on_map: Some(self.show_on_map),
            alert_message: Some(self.message.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speaker_defaults() {
        let p = SpeakerParameters::default();
        assert_eq!(p.volume, 1.0);
        assert!(!p.play_globally);
        assert!(p.allow_polyphony);
    }

    #[test]
    fn merge_keeps_untouched_fields() {
        let mut p = AlertParameters::default();
        p.merge(&AlertParametersData {
            alert_message: Some("low iron".into()),
            ..AlertParametersData::default()
        });
        assert_eq!(p.message, "low iron");
        assert!(p.show_on_map);
        assert!(!p.show_alert);
    }

    #[test]
    fn circuit_parameters_export_every_field() {
        let mut p = CircuitParameters::default();
        p.merge(&CircuitParametersData {
            note_id: Some(5),
            ..CircuitParametersData::default()
        });
        assert_eq!(
            p.to_data(),
            CircuitParametersData {
                signal_value_is_pitch: Some(false),
                instrument_id: Some(0),
                note_id: Some(5),
            }
        );
    }
}
