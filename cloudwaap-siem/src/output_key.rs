//! Sink key derivation

use crate::config::{OutputFormat, OutputOptions, PipelineConfig, SuffixMode};

const INPUT_EXTENSION: &str = ".json.gz";

/// Derives the sink key of a processed object from its source key
#[derive(Debug, Clone, Copy)]
pub struct OutputKeyBuilder<'a> {
    options: &'a OutputOptions,
    format: OutputFormat,
}

impl<'a> OutputKeyBuilder<'a> {
    pub fn new(options: &'a OutputOptions, format: OutputFormat) -> Self {
        Self { options, format }
    }

    pub fn from_config(config: &'a PipelineConfig) -> Self {
        Self::new(&config.output, config.output_format)
    }

    /// Key for a converted object.
    ///
    /// `.json.gz` becomes the output extension, which is appended when the
    /// relocated key does not already end with it.
    pub fn build(&self, key: &str) -> String {
        let extension = self.format.extension();
        let mut out = self.relocate(key).replace(INPUT_EXTENSION, extension);

        if !out.ends_with(extension) {
            out.push_str(extension);
        }

        trim_root(out)
    }

    /// Key for an object forwarded unchanged; only the location changes.
    pub fn passthrough(&self, key: &str) -> String {
        trim_root(self.relocate(key))
    }

    fn relocate(&self, key: &str) -> String {
        let options = self.options;

        if !options.keep_original_folder_structure {
            let file_name = key.rsplit('/').next().unwrap_or(key);
            let folder = options.destination_folder.trim_end_matches('/');
            return format!("{folder}/{file_name}");
        }

        let (first, rest) = key.split_at(key.find('/').unwrap_or(key.len()));
        let first = match options.suffix_mode {
            SuffixMode::Remove if !options.original_suffix.is_empty() => {
                first.replace(&format!("-{}", options.original_suffix), "")
            }
            SuffixMode::Add => format!("{first}-{}", options.new_suffix),
            _ => first.to_string(),
        };

        first + rest
    }
}

fn trim_root(key: String) -> String {
    match key.strip_prefix('/') {
        Some(stripped) => stripped.to_string(),
        None => key,
    }
}
