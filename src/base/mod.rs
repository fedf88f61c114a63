mod aggregate;
pub mod analytics;
mod cents;
mod config;
mod date;
mod datepart;
pub mod export;
pub mod extract;
mod filter;
pub mod fs;
pub mod gateway;
mod ingest;
mod interval;
mod reconcile;
mod record;
mod recordlist;
mod status;
mod timestamp;

pub use aggregate::Aggregate;
pub use cents::Cents;
pub use cents::Rate;
pub use config::Config;
pub use config::ExtractorConfig;
pub use config::StoreConfig;
pub use date::Date;
pub use datepart::Datepart;
pub use extract::ExtractedFields;
pub use extract::ExtractionError;
pub use extract::Extractor;
pub use extract::Image;
pub use extract::gemini::GeminiExtractor;
pub use filter::Filter;
pub use filter::Page;
pub use filter::Selection;
pub use filter::Totals;
pub use fs::Fs;
pub use gateway::Gateway;
pub use gateway::Refresh;
pub use gateway::StoreError;
pub use gateway::file::FileStore;
pub use gateway::rest::RestStore;
pub use ingest::IngestError;
pub use ingest::Ingested;
pub use ingest::Phase;
pub use ingest::Upload;
pub use ingest::build_receipt;
pub use ingest::ingest;
pub use interval::Interval;
pub use reconcile::Correction;
pub use reconcile::ReconcileError;
pub use reconcile::ValidationError;
pub use reconcile::batch_assign;
pub use reconcile::batch_status;
pub use reconcile::correct;
pub use record::Amounts;
pub use record::FieldUpdate;
pub use record::Receipt;
pub use record::ReceiptRecord;
pub use record::RecordId;
pub use record::SUGGESTED_CATEGORIES;
pub use recordlist::Recordlist;
pub use status::Status;
pub use timestamp::Timestamp;
