//! `render` command: compose one page and write it out.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use url::Url;

use super::RenderArgs;
use super::common::{compose_page, load_page};
use crate::config::Config;
use crate::dom::Document;
use crate::include::{build_client, discover};
use crate::log;
use crate::utils::plural_count;

/// Run the `render` command.
pub fn render_page(args: &RenderArgs, config: &Config) -> Result<()> {
    let page_url = Url::parse(&args.page)
        .with_context(|| format!("`{}` is not an absolute URL", args.page))?;
    let client = build_client(&config.fetch.user_agent)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    let html = runtime.block_on(load_page(&client, &page_url))?;

    if args.dry {
        return list_includes(&html, config, &mut io::stdout().lock());
    }

    let output = runtime.block_on(compose_page(&html, &page_url, &client, &config.include));
    match &args.output {
        Some(path) => {
            write_output(path, &output.html)?;
            log!(
                "render";
                "{} -> {} ({})",
                page_url,
                path.display(),
                plural_count(output.includes, "include")
            );
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(output.html.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Print each placeholder's declared path and the URL it resolves to.
fn list_includes(html: &str, config: &Config, out: &mut impl Write) -> Result<()> {
    let doc = Document::parse(html);
    let options = config.include.options_for(&doc);
    for target in discover(&doc, &options) {
        writeln!(out, "{}\t{}", target.path, target.url)?;
    }
    Ok(())
}

fn write_output(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, html).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::IncludeArgs;
    use crate::utils::test_server::{Route, spawn_server};

    const ROUTES: &[Route] = &[
        (
            "/blog/post.html",
            200,
            r#"<script src="/include.js" data-site-root=".."></script><div data-include="parts/nav.html"></div><footer data-include="/parts/footer.html"></footer>"#,
        ),
        ("/parts/nav.html", 200, "<nav>N</nav>"),
        ("/parts/footer.html", 200, "<footer>F</footer>"),
    ];

    fn args(page: String, output: Option<&Path>, dry: bool) -> RenderArgs {
        RenderArgs {
            page,
            output: output.map(Path::to_path_buf),
            dry,
            include: IncludeArgs {
                site_root: None,
                attribute: None,
                verbose: false,
            },
        }
    }

    #[test]
    fn test_list_includes() {
        let html = r#"<script src="include.js" data-site-root=".."></script><div data-include="parts/nav.html"></div><div data-include="/abs.html"></div>"#;
        let mut out = Vec::new();

        list_includes(html, &Config::default(), &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "parts/nav.html\t../parts/nav.html\n/abs.html\t/abs.html\n"
        );
    }

    #[test]
    fn test_render_to_file() {
        let origin = spawn_server(ROUTES);
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out/post.html");
        let page = origin.join("blog/post.html").unwrap().to_string();

        render_page(&args(page, Some(&output), false), &Config::default()).unwrap();

        let written = fs::read_to_string(&output).unwrap();
        assert!(written.ends_with("<body><nav>N</nav><footer>F</footer></body></html>"));
    }

    #[test]
    fn test_render_rejects_relative_url() {
        let err = render_page(&args("blog/post.html".into(), None, false), &Config::default())
            .unwrap_err();
        assert!(err.to_string().contains("not an absolute URL"));
    }

    #[test]
    fn test_render_fails_on_missing_page() {
        let origin = spawn_server(ROUTES);
        let page = origin.join("nope.html").unwrap().to_string();
        assert!(render_page(&args(page, None, false), &Config::default()).is_err());
    }
}
