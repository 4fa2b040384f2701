// Cloud WAAP log normalizer
//
// Converts exported Cloud WAAP security logs into SIEM ingestion formats,
// driven by the object key and tenant/application filter policy.

// Re-export the normalizer
pub use cloudwaap_siem::*;

// Re-export optional crates
#[cfg(feature = "log")]
pub use cloudwaap_log;

#[cfg(feature = "config")]
pub use cloudwaap_config;

#[cfg(feature = "compression")]
pub use cloudwaap_compression;

/// Common imports for pipeline hosts
pub mod prelude {
    pub use cloudwaap_siem::{
        FilterPolicy, LocalStore, LogType, MemoryStore, OutputFormat, Pipeline, PipelineConfig,
        ProcessOutcome, ProcessReport, SiemError, SiemResult, Sink, Source,
    };

    #[cfg(feature = "log")]
    pub use cloudwaap_log::{LogConfig, init as init_logging};
}
