pub mod draft;
pub mod error;
pub mod extract;
pub mod extractor;
pub mod fetch;
pub mod images;
pub mod noise;
pub mod parse;
pub mod thumbnail;
pub mod title;

pub use draft::{PostDraft, slugify};
pub use error::{ErrorKind, ExtractionError, Result};
pub use extract::{CONTENT_SELECTORS, ExtractConfig, PLACEHOLDER_CONTENT};
#[doc(hidden)]
pub use extract::{CompiledRules, ExtractedContent, select_content};
pub use extractor::{ExtractionResult, Extractor, ExtractorConfig, ExtractorConfigBuilder, extract_from_html};
pub use fetch::{DEFAULT_USER_AGENT, FetchConfig, FetchedPage, Fetcher, HttpFetcher, validate_url};
pub use noise::{NOISE_SELECTORS, NoiseFilter};
pub use parse::Document;
pub use title::{UNTITLED, clean_title};
pub use tokio_util::sync::CancellationToken;
