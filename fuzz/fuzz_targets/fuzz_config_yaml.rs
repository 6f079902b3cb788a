#![no_main]

use datagen_cli::commands::generate::build_header;
use datagen_cli::config::Config;
use datagen_modules::ParamRegistry;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(config) = Config::from_yaml(text) else {
        return;
    };
    let registry = ParamRegistry::new(config.global_parameters.clone());
    for output in &config.outputs {
        // Rendering must fail with an error, never panic.
        if let Ok(header) = build_header(output, &registry) {
            let _ = header.render();
        }
    }
});
