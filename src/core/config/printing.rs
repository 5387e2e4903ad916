use crate::core::config::data::{mask_secret, path_display, Config};
use crate::core::config::defaults::{DEFAULT_BASE_URL, DEFAULT_MODEL};

impl Config {
    pub fn print_all(&self) {
        println!("Current configuration:");
        match &self.api_key {
            Some(key) => println!("  api-key: {}", mask_secret(key)),
            None => println!("  api-key: (unset)"),
        }
        match &self.model {
            Some(model) => println!("  model: {model}"),
            None => println!("  model: (unset, using {DEFAULT_MODEL})"),
        }
        match &self.base_url {
            Some(url) => println!("  base-url: {url}"),
            None => println!("  base-url: (unset, using {DEFAULT_BASE_URL})"),
        }
        match &self.data_dir {
            Some(dir) => println!("  data-dir: {}", path_display(dir)),
            None => println!("  data-dir: (unset)"),
        }
    }
}
