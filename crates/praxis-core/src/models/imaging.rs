use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// An imaging study. The engine reads only `date` and `processed`;
/// `path` is carried through for the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ImagingEvent {
    pub date: jiff::Timestamp,
    pub path: String,
    #[serde(default)]
    pub processed: bool,
}
