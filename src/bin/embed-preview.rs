//! Runs the embed decision against a simulated browser and prints the page.
//!
//! ```text
//! embed-preview report.pdf --env iphone --options opts.json --out preview.html
//! ```

use std::env;
use std::fs;
use std::path::Path;
use std::process::ExitCode;

use pdf_embed::{EmbedOptions, EnvironmentSnapshot, MarkupDocument, PdfEmbed, Target};

const DEFAULT_ENV: &str = "desktop-chrome";
const CONTAINER_ID: &str = "pdf";

const USAGE: &str = "\
usage: embed-preview <url-or-path> [options]

  --env <preset>        desktop-chrome, desktop-firefox, desktop-safari,
                        iphone, ipad-desktop-mode, android, legacy
  --env-file <json>     environment snapshot (overrides --env)
  --options <json>      embed options file (camelCase keys)
  --target <selector>   container selector; empty string targets <body>
  --out <file>          write the page here instead of stdout";

#[derive(Debug)]
struct Args {
    source: String,
    env_preset: String,
    env_file: Option<String>,
    options_file: Option<String>,
    target: String,
    out_path: Option<String>,
}

fn parse_args(args: Vec<String>) -> Result<Args, String> {
    let mut iter = args.into_iter().skip(1);
    let mut parsed = Args {
        source: String::new(),
        env_preset: DEFAULT_ENV.to_string(),
        env_file: None,
        options_file: None,
        target: format!("#{CONTAINER_ID}"),
        out_path: None,
    };

    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .ok_or_else(|| format!("{flag} expects a value"))
        };
        match arg.as_str() {
            "-h" | "--help" => return Err("help requested".to_string()),
            "--env" => parsed.env_preset = value("--env")?,
            "--env-file" => parsed.env_file = Some(value("--env-file")?),
            "--options" => parsed.options_file = Some(value("--options")?),
            "--target" => parsed.target = value("--target")?,
            "--out" => parsed.out_path = Some(value("--out")?),
            flag if flag.starts_with("--") => return Err(format!("unknown flag {flag}")),
            _ if parsed.source.is_empty() => parsed.source = arg.clone(),
            _ => return Err(format!("unexpected argument {arg}")),
        }
    }

    if parsed.source.is_empty() {
        return Err("missing <url-or-path>".to_string());
    }
    Ok(parsed)
}

fn preset(name: &str) -> Result<EnvironmentSnapshot, String> {
    let env = match name {
        "desktop-chrome" => EnvironmentSnapshot::new(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        )
        .with_vendor("Google Inc.")
        .with_platform("Win32")
        .with_mobile_hint(false)
        .with_pdf_viewer_enabled(true),
        "desktop-firefox" => EnvironmentSnapshot::new(
            "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0",
        )
        .with_platform("Linux x86_64")
        .with_pdf_viewer_enabled(true),
        "desktop-safari" => EnvironmentSnapshot::new(
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15",
        )
        .with_vendor("Apple Computer, Inc.")
        .with_platform("MacIntel"),
        "iphone" => EnvironmentSnapshot::new(
            "Mozilla/5.0 (iPhone; CPU iPhone OS 17_1 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Mobile/15E148 Safari/604.1",
        )
        .with_vendor("Apple Computer, Inc.")
        .with_platform("iPhone")
        .with_max_touch_points(5),
        "ipad-desktop-mode" => EnvironmentSnapshot::new(
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15",
        )
        .with_vendor("Apple Computer, Inc.")
        .with_platform("MacIntel")
        .with_max_touch_points(5),
        "android" => EnvironmentSnapshot::new(
            "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36",
        )
        .with_vendor("Google Inc.")
        .with_platform("Linux armv8l")
        .with_mobile_hint(true)
        .with_max_touch_points(5),
        "legacy" => EnvironmentSnapshot::new(
            "Mozilla/4.0 (compatible; MSIE 8.0; Windows NT 6.1; Trident/4.0)",
        )
        .with_platform("Win32")
        .with_modern_runtime(false),
        other => return Err(format!("unknown environment preset {other}")),
    };
    Ok(env)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("{path}: {e}"))?;
    serde_json::from_str(&text).map_err(|e| format!("{path}: {e}"))
}

/// Local files become `file://` URLs; anything else is used as given.
fn resolve_source(source: &str) -> String {
    let path = Path::new(source);
    if !path.exists() {
        return source.to_string();
    }
    path.canonicalize()
        .ok()
        .and_then(|absolute| url::Url::from_file_path(absolute).ok())
        .map(|url| url.to_string())
        .unwrap_or_else(|| source.to_string())
}

fn render_page(args: &Args) -> Result<String, String> {
    let env = match &args.env_file {
        Some(path) => read_json::<EnvironmentSnapshot>(path)?,
        None => preset(&args.env_preset)?,
    };
    let options = match &args.options_file {
        Some(path) => read_json::<EmbedOptions>(path)?,
        None => EmbedOptions::default(),
    };
    let url = resolve_source(&args.source);

    let mut doc = MarkupDocument::new();
    let container = doc.element("div");
    doc.attr(container, "id", CONTAINER_ID);
    let body = doc.body();
    doc.append(body, container);

    let embedder = PdfEmbed::new(env);
    log::info!(
        "supports_pdfs={} signals={:?}",
        embedder.supports_pdfs(),
        embedder.signals()
    );
    embedder.embed(&mut doc, &url, Target::Selector(&args.target), &options);

    Ok(format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>PDF embed preview</title></head>\n{}\n</html>\n",
        doc.outer_html(body)
    ))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let args = match parse_args(env::args().collect()) {
        Ok(args) => args,
        Err(e) => {
            if e != "help requested" {
                eprintln!("error: {e}");
            }
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };

    let page = match render_page(&args) {
        Ok(page) => page,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match &args.out_path {
        Some(path) => {
            if let Err(e) = fs::write(path, page) {
                eprintln!("error: {path}: {e}");
                return ExitCode::FAILURE;
            }
            log::info!("wrote {}", path);
        }
        None => print!("{page}"),
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        std::iter::once("embed-preview")
            .chain(args.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_parse_args_defaults() {
        let args = parse_args(argv(&["https://example.com/a.pdf"])).unwrap();
        assert_eq!(args.source, "https://example.com/a.pdf");
        assert_eq!(args.env_preset, DEFAULT_ENV);
        assert_eq!(args.target, "#pdf");
        assert!(args.out_path.is_none());
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(parse_args(argv(&[])).is_err());
        assert!(parse_args(argv(&["a.pdf", "--env"])).is_err());
        assert!(parse_args(argv(&["a.pdf", "--bogus"])).is_err());
        assert!(parse_args(argv(&["a.pdf", "b.pdf"])).is_err());
    }

    #[test]
    fn test_presets_classify_as_named() {
        assert!(PdfEmbed::new(preset("desktop-chrome").unwrap()).supports_pdfs());
        assert!(PdfEmbed::new(preset("legacy").unwrap()).supports_pdfs());
        assert!(!PdfEmbed::new(preset("iphone").unwrap()).supports_pdfs());
        assert!(!PdfEmbed::new(preset("ipad-desktop-mode").unwrap()).supports_pdfs());
        assert!(PdfEmbed::new(preset("desktop-safari").unwrap()).signals().is_desktop_safari);
        assert!(preset("netscape").is_err());
    }

    #[test]
    fn test_render_page_mobile_fallback() {
        let args = parse_args(argv(&["https://example.com/a.pdf", "--env", "android"])).unwrap();
        let page = render_page(&args).unwrap();
        assert!(page.contains("<a href=\"https://example.com/a.pdf\">Download PDF</a>"));
    }
}
