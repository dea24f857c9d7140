//! Output rendering: the site document, its metadata module and the
//! client-rendered `.doku` format.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use doku_markdown::CompiledDoc;
use serde::Serialize;
use serde_json::json;

use crate::assembler::{id_token, LanguagePages};
use crate::assets::{AssetManifest, AssetPipeline, DARK_SCOPE, RUNTIME_FILE, RUNTIME_JS};
use crate::build_id::BuildId;
use crate::builder::{write_file, BuildError};
use crate::config::ProjectConfig;
use crate::templates::{
    flag_emoji, script_json, social_icon_class, DokuIndexContext, DokuLink, LanguageView, NavLink,
    SiteContext, SocialLink, StandaloneContext, TemplateEngine,
};

/// Directory under `res/` holding the raw `.doku` pages.
pub const PAGES_DIR: &str = "pages";

/// The inline site stylesheet, minified when the project asks for it.
///
/// Falls back to the unminified stylesheet if minification fails.
pub fn stylesheet(config: &ProjectConfig) -> String {
    let css = AssetPipeline::generate_css(&config.primary, &config.accent);
    if !config.minify {
        return css;
    }
    match AssetPipeline::minify_css(&css) {
        Ok(minified) => minified,
        Err(e) => {
            tracing::warn!("{}; using unminified CSS", e);
            css
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BootData<'a> {
    default_lang: &'a str,
    languages: Vec<&'a crate::config::Language>,
    nav_by_lang: BTreeMap<&'a str, Vec<NavLink>>,
    flags: BTreeMap<&'a str, &'static str>,
}

/// Render the monolithic site document.
pub fn render_site(
    engine: &TemplateEngine,
    config: &ProjectConfig,
    languages: &[LanguagePages],
    build_id: &BuildId,
    css: String,
) -> Result<String, BuildError> {
    let default_lang = config.default_language().code.clone();

    let boot = BootData {
        default_lang: &default_lang,
        languages: config.languages.iter().collect(),
        nav_by_lang: languages
            .iter()
            .map(|l| (l.language.code.as_str(), l.nav_links()))
            .collect(),
        flags: config
            .languages
            .iter()
            .map(|l| (l.code.as_str(), flag_emoji(&l.code)))
            .collect(),
    };
    let boot_json = script_json(&boot).map_err(|e| BuildError::TemplateError(e.to_string()))?;

    let views = languages
        .iter()
        .map(|l| LanguageView {
            code: l.language.code.clone(),
            label: l.language.label.clone(),
            flag: flag_emoji(&l.language.code).to_string(),
            visible: l.language.code == default_lang,
            toc_html: l.toc_html(),
            body_html: l.body_html(),
        })
        .collect();

    let header_nav = languages
        .iter()
        .find(|l| l.language.code == default_lang)
        .map(LanguagePages::nav_links)
        .unwrap_or_default();

    let context = SiteContext {
        title: config.title.clone(),
        default_lang,
        css,
        logo: config.logo.clone(),
        socials: social_links(config),
        author: config.author.clone(),
        header_nav,
        languages: views,
        boot_json,
        script_file: build_id.js_file(),
    };

    engine
        .render("site.html", &context)
        .map_err(|e| BuildError::TemplateError(e.to_string()))
}

/// Repository link first, then every configured social that has a URL.
fn social_links(config: &ProjectConfig) -> Vec<SocialLink> {
    let repo = config.repo.iter().map(|url| SocialLink {
        url: url.clone(),
        title: "Repository".to_string(),
        icon: social_icon_class("github").to_string(),
    });

    let socials = config.socials.iter().filter_map(|s| {
        let url = s.url.clone().filter(|u| !u.trim().is_empty())?;
        let icon = s.icon.as_deref().unwrap_or("link");
        Some(SocialLink {
            url,
            title: s.title.clone().unwrap_or_else(|| icon.to_string()),
            icon: social_icon_class(icon).to_string(),
        })
    });

    repo.chain(socials).collect()
}

/// Render the metadata module (`index_<id>.js`).
pub fn render_metadata(
    config: &ProjectConfig,
    languages: &[LanguagePages],
    assets: &AssetManifest,
    build_id: &BuildId,
) -> Result<String, BuildError> {
    let pages: Vec<_> = languages.iter().flat_map(|l| l.pages.iter()).collect();

    let doku = json!({
        "doku": config.raw.doku,
        "version": config.raw.version,
        "config": config.raw.config,
        "site": config.raw.site,
        "assets": assets,
        "pages": pages,
    });

    let body = serde_json::to_string_pretty(&doku).map_err(|e| BuildError::WriteError(e.to_string()))?;
    let id = serde_json::to_string(build_id.as_str()).map_err(|e| BuildError::WriteError(e.to_string()))?;

    Ok(format!(
        "// Doku runtime metadata for {}\nexport const doku = {};\nconsole.log('Doku build', {}, doku);\n",
        build_id, body, id
    ))
}

/// Path of a page's `.doku` copy relative to `res/`.
///
/// Root, prefix and `..` components of `rel` are dropped so the copy always
/// lands under `pages/<lang>/`.
pub fn doku_page_path(lang: &str, rel: &str) -> String {
    let parts: Vec<_> = Path::new(rel)
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect();
    let stem = Path::new(&parts.join("/")).with_extension("doku");
    format!("{}/{}/{}", PAGES_DIR, id_token(lang), stem.to_string_lossy())
}

/// Write every page's raw source under `res/pages/<lang>/` along with the
/// browser runtime.
pub fn write_doku_pages(res_dir: &Path, languages: &[LanguagePages]) -> Result<Vec<PathBuf>, BuildError> {
    let mut written = Vec::new();

    for lang in languages {
        for page in &lang.pages {
            let path = res_dir.join(doku_page_path(&lang.language.code, &page.rel));
            write_file(&path, &page.raw)?;
            written.push(path);
        }
    }

    write_file(&res_dir.join(RUNTIME_FILE), RUNTIME_JS)?;

    tracing::debug!("Wrote {} .doku pages", written.len());

    Ok(written)
}

/// Render the client-rendered entry point (`index_doku_<id>.html`).
pub fn render_doku_index(
    engine: &TemplateEngine,
    config: &ProjectConfig,
    languages: &[LanguagePages],
) -> Result<String, BuildError> {
    let first_page = |lang: &LanguagePages| {
        lang.pages
            .first()
            .map(|page| doku_page_path(&lang.language.code, &page.rel))
    };

    let links = languages
        .iter()
        .filter_map(|lang| {
            Some(DokuLink {
                label: lang.language.label.clone(),
                href: first_page(lang)?,
            })
        })
        .collect();

    let default_lang = config.default_language().code.clone();
    let first_src = languages
        .iter()
        .find(|l| l.language.code == default_lang)
        .and_then(first_page);

    let context = DokuIndexContext {
        title: config.title.clone(),
        default_lang,
        runtime_file: RUNTIME_FILE.to_string(),
        links,
        first_src,
    };

    engine
        .render("doku_index.html", &context)
        .map_err(|e| BuildError::TemplateError(e.to_string()))
}

/// Wrap a single compiled document in a minimal HTML page.
pub fn render_standalone(doc: &CompiledDoc) -> Result<String, BuildError> {
    let context = StandaloneContext {
        title: doc.title.clone(),
        css: doku_markdown::highlight::theme_css(DARK_SCOPE),
        content: doc.html.clone(),
    };

    TemplateEngine::new()
        .render("standalone.html", &context)
        .map_err(|e| BuildError::TemplateError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::Page;
    use crate::config::{merge, Language, RawSources, Social};
    use pretty_assertions::assert_eq;
    use serde_json::Map;
    use tempfile::tempdir;

    fn page(lang: &str, rel: &str, title: &str) -> Page {
        Page {
            lang: lang.to_string(),
            rel: rel.to_string(),
            title: title.to_string(),
            html: format!("<p>{}</p>\n", title),
            meta: Map::new(),
            raw: format!("# {}\n", title),
        }
    }

    fn two_languages() -> (ProjectConfig, Vec<LanguagePages>) {
        let raw = RawSources {
            site: json!({"languages": ["en", {"code": "ru", "label": "Русский"}]}),
            ..Default::default()
        };
        let config = merge(raw);
        let languages = vec![
            LanguagePages {
                language: Language::new("en", "EN"),
                pages: vec![page("en", "intro.md", "Intro"), page("en", "guide/setup.md", "Setup")],
            },
            LanguagePages {
                language: Language::new("ru", "Русский"),
                pages: vec![page("ru", "intro.ru.md", "Введение")],
            },
        ];
        (config, languages)
    }

    #[test]
    fn site_shows_only_default_language() {
        let (config, languages) = two_languages();
        let id = BuildId::generate("build");

        let html = render_site(&TemplateEngine::new(), &config, &languages, &id, String::new()).unwrap();

        assert_eq!(html.matches("style=\"display:block\"").count(), 2);
        assert_eq!(html.matches("style=\"display:none\"").count(), 2);
        assert!(html.contains("<section id=\"section-ru-0\""));
        assert!(html.contains("href=\"#section-en-1\">Setup</a>"));
        assert!(html.contains(&id.js_file()));
        assert!(html.contains("\"navByLang\""));
    }

    #[test]
    fn repo_link_comes_before_socials() {
        let (mut config, _) = two_languages();
        config.repo = Some("https://example.com/repo".to_string());
        config.socials = vec![
            Social {
                icon: Some("discord".to_string()),
                url: Some("https://discord.gg/x".to_string()),
                title: None,
            },
            Social {
                icon: Some("x".to_string()),
                url: None,
                title: None,
            },
        ];

        let links = social_links(&config);

        assert_eq!(links.len(), 2);
        assert_eq!(links[0].title, "Repository");
        assert_eq!(links[1].icon, "fa-brands fa-discord");
        assert_eq!(links[1].title, "discord");
    }

    #[test]
    fn metadata_module_lists_pages() {
        let (config, languages) = two_languages();
        let id = BuildId::generate("rel");

        let js = render_metadata(&config, &languages, &AssetManifest::new(), &id).unwrap();

        assert!(js.starts_with(&format!("// Doku runtime metadata for {}\nexport const doku = {{", id)));
        assert!(js.ends_with(&format!("console.log('Doku build', \"{}\", doku);\n", id)));
        assert!(js.contains("\"rel\": \"guide/setup.md\""));
        assert!(js.contains("\"lang\": \"ru\""));
        assert!(js.contains("\"assets\": {}"));
    }

    #[test]
    fn doku_pages_keep_relative_directories() {
        assert_eq!(doku_page_path("en", "intro.md"), "pages/en/intro.doku");
        assert_eq!(doku_page_path("ru", "intro.ru.md"), "pages/ru/intro.ru.doku");
        assert_eq!(doku_page_path("en", "guide/setup.md"), "pages/en/guide/setup.doku");
    }

    #[test]
    fn doku_pages_stay_under_their_language() {
        assert_eq!(doku_page_path("en", "../../../x.md"), "pages/en/x.doku");
        assert_eq!(doku_page_path("en", "/abs/y.md"), "pages/en/abs/y.doku");
        assert_eq!(doku_page_path("en", "./guide/../z.md"), "pages/en/guide/z.doku");
        assert_eq!(doku_page_path("../en", "a.md"), "pages/___en/a.doku");
    }

    #[test]
    fn escaping_sources_are_written_inside_pages() {
        let temp = tempdir().unwrap();
        let res = temp.path().join("res");
        let languages = vec![LanguagePages {
            language: Language::new("en", "EN"),
            pages: vec![page("en", "../../outside.md", "Outside")],
        }];

        write_doku_pages(&res, &languages).unwrap();

        assert!(res.join("pages/en/outside.doku").exists());
        assert!(!temp.path().join("outside.doku").exists());
    }

    #[test]
    fn writes_doku_pages_and_runtime() {
        let (_, languages) = two_languages();
        let temp = tempdir().unwrap();

        let written = write_doku_pages(temp.path(), &languages).unwrap();

        assert_eq!(written.len(), 3);
        assert_eq!(
            std::fs::read_to_string(temp.path().join("pages/en/guide/setup.doku")).unwrap(),
            "# Setup\n"
        );
        assert_eq!(
            std::fs::read_to_string(temp.path().join(RUNTIME_FILE)).unwrap(),
            RUNTIME_JS
        );
    }

    #[test]
    fn doku_index_renders_first_page() {
        let (config, languages) = two_languages();

        let html = render_doku_index(&TemplateEngine::new(), &config, &languages).unwrap();

        assert!(html.contains("<script src=\"dokujs.js\"></script>"));
        assert_eq!(html.matches("<doku src=").count(), 1);
        assert!(html.contains("intro.doku"));
        assert!(html.contains("Русский</a>"));
    }

    #[test]
    fn standalone_wraps_compiled_doc() {
        let doc = doku_markdown::compile("# Hello\n\nWorld\n");

        let html = render_standalone(&doc).unwrap();

        assert!(html.contains("<title>Hello</title>"));
        assert!(html.contains("<h1>Hello</h1>"));
        assert!(html.contains("<p>World</p>"));
    }

    #[test]
    fn stylesheet_respects_minify_flag() {
        let (mut config, _) = two_languages();
        config.minify = false;
        let plain = stylesheet(&config);
        config.minify = true;
        let minified = stylesheet(&config);

        assert!(plain.starts_with(":root { --primary: #0f62fe;"));
        assert!(minified.len() < plain.len());
    }
}
