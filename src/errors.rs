use crate::loc::Loc;
use serde::Serialize;

// A tolerated anomaly: the engine drops the offending node and keeps
// going. Fatal conditions abort the whole ingestion instead.
#[derive(Debug, Clone, Serialize)]
pub struct Warning {
    pub message: String,
    pub loc: Loc,
}
