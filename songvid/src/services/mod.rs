//! Service modules for the acquisition pipeline
//!
//! Leaf-first: descriptor reader, song scanner, search resolver, collaborator
//! adapters (yt-dlp, YouTube Data API) and the orchestrator tying them together.

pub mod acquisition_orchestrator;
pub mod descriptor_reader;
pub mod search_resolver;
pub mod song_scanner;
pub mod youtube_api_client;
pub mod ytdlp;

pub use acquisition_orchestrator::{AcquisitionOrchestrator, AcquisitionSettings, RunSummary};
pub use descriptor_reader::{DescriptorError, SongDescriptor};
pub use search_resolver::{QueryBuilder, ResolveError, SearchResolver};
pub use song_scanner::{ScanError, SongDirs, SongScanner};
pub use youtube_api_client::YouTubeApiClient;
pub use ytdlp::{YtDlpFetcher, YtDlpSearch};
