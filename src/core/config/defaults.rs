pub const DEFAULT_HUGGINGFACE_URL: &str = "https://api-inference.huggingface.co/models/gpt2";
pub const DEFAULT_NLPCLOUD_URL: &str = "https://api.nlpcloud.io/v1/gpu/chatgpt/chat";

pub const DEFAULT_FALLBACK_ON_FAILURE: bool = true;

pub const HUGGINGFACE_API_KEY_ENV: &str = "CHATDECK_HUGGINGFACE_API_KEY";
pub const NLPCLOUD_API_KEY_ENV: &str = "CHATDECK_NLPCLOUD_API_KEY";
