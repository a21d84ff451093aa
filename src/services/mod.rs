pub mod classifier;
pub mod evidence_capture;
pub mod report_exporter;
pub mod result_recorder;
pub mod search_session;

pub use classifier::{classify, ClassificationResult};
pub use evidence_capture::EvidenceCapture;
pub use report_exporter::ReportExporter;
pub use result_recorder::ResultRecorder;
pub use search_session::{SearchSession, SessionState};
