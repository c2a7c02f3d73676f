/// External AI and media services used while building sets
///
/// Each service sits behind a trait so pipelines can run against in-process
/// fakes; the concrete clients talk to DeepL, OpenAI and Pexels.

pub mod images;
pub mod speech;
pub mod translate;

pub use images::{find_or_fetch_image, FoundImage, ImageLibrary, ImageSearch, PexelsClient};
pub use speech::{audio_filename, ensure_audio, OpenAISpeech, SpeechSynthesizer};
pub use translate::{translate_or_skip, DeepLTranslator, TranslatedText, Translator};
