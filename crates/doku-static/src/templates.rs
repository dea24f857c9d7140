//! Template engine for rendering the emitted HTML documents.

use minijinja::Environment;
use serde::Serialize;

use crate::config::Author;

/// A link in the header navigation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavLink {
    /// Display text
    pub text: String,
    /// Anchor id of the target section (without `#`)
    pub anchor: String,
}

/// A social or repository link.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SocialLink {
    pub url: String,
    pub title: String,
    /// Font Awesome icon classes
    pub icon: String,
}

/// Everything rendered for one language.
#[derive(Debug, Clone, Serialize)]
pub struct LanguageView {
    pub code: String,
    pub label: String,
    /// Flag emoji
    pub flag: String,
    /// Whether this language's subtree is initially shown
    pub visible: bool,
    /// Pre-rendered table of contents items
    pub toc_html: String,
    /// Pre-rendered section bodies
    pub body_html: String,
}

/// Context for the main site document.
#[derive(Debug, Clone, Serialize)]
pub struct SiteContext {
    pub title: String,
    pub default_lang: String,
    pub css: String,
    pub logo: Option<String>,
    pub socials: Vec<SocialLink>,
    pub author: Option<Author>,
    pub header_nav: Vec<NavLink>,
    pub languages: Vec<LanguageView>,
    /// JSON consumed by the language switcher script
    pub boot_json: String,
    /// File name of the companion metadata module
    pub script_file: String,
}

/// A language link on the client-rendered entry point.
#[derive(Debug, Clone, Serialize)]
pub struct DokuLink {
    pub label: String,
    pub href: String,
}

/// Context for the client-rendered entry point.
#[derive(Debug, Clone, Serialize)]
pub struct DokuIndexContext {
    pub title: String,
    pub default_lang: String,
    pub runtime_file: String,
    pub links: Vec<DokuLink>,
    /// Source of the initially rendered page, if any
    pub first_src: Option<String>,
}

/// Context for a single compiled document.
#[derive(Debug, Clone, Serialize)]
pub struct StandaloneContext {
    pub title: String,
    pub css: String,
    pub content: String,
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the built-in templates.
    pub fn new() -> Self {
        let mut env = Environment::new();

        env.add_template_owned("site.html".to_string(), SITE_TEMPLATE.to_string())
            .expect("Failed to add site template");

        env.add_template_owned("doku_index.html".to_string(), DOKU_INDEX_TEMPLATE.to_string())
            .expect("Failed to add doku index template");

        env.add_template_owned("standalone.html".to_string(), STANDALONE_TEMPLATE.to_string())
            .expect("Failed to add standalone template");

        Self { env }
    }

    /// Render a template with a serializable context.
    pub fn render<S: Serialize>(&self, template: &str, context: &S) -> Result<String, minijinja::Error> {
        self.env.get_template(template)?.render(context)
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialize a value as JSON that is safe to embed in a `<script>` element.
pub fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

/// Flag emoji for a language code.
pub fn flag_emoji(code: &str) -> &'static str {
    match code.to_lowercase().as_str() {
        "en" => "🇺🇸",
        "ru" => "🇷🇺",
        "es" => "🇲🇽",
        "pt" => "🇧🇷",
        "fr" => "🇫🇷",
        "de" => "🇩🇪",
        "it" => "🇮🇹",
        "zh" => "🇨🇳",
        "ja" => "🇯🇵",
        "ko" => "🇰🇷",
        "ar" => "🇪🇬",
        "hi" => "🇮🇳",
        "bn" => "🇧🇩",
        "tr" => "🇹🇷",
        "fa" => "🇮🇷",
        "ur" => "🇵🇰",
        "id" => "🇮🇩",
        "vi" => "🇻🇳",
        "th" => "🇹🇭",
        "pl" => "🇵🇱",
        "uk" => "🇺🇦",
        "nl" => "🇳🇱",
        "sv" => "🇸🇪",
        "no" => "🇳🇴",
        "da" => "🇩🇰",
        "cs" => "🇨🇿",
        "el" => "🇬🇷",
        "he" => "🇮🇱",
        "sk" => "🇸🇰",
        "ro" => "🇷🇴",
        "hu" => "🇭🇺",
        "pirate" => "🏴\u{200d}☠\u{fe0f}",
        "hacker" => "🧑\u{200d}💻",
        "emoticon" => "🙂",
        "lolcat" => "😺",
        "klingon" => "🛸",
        "elvish" => "🍃",
        _ => "🏳\u{fe0f}",
    }
}

/// Font Awesome classes for a social icon name.
pub fn social_icon_class(icon: &str) -> &'static str {
    match icon {
        "github" => "fa-brands fa-github",
        "gitlab" => "fa-brands fa-gitlab",
        "x" | "twitter" => "fa-brands fa-x-twitter",
        "linkedin" => "fa-brands fa-linkedin",
        "youtube" => "fa-brands fa-youtube",
        "discord" => "fa-brands fa-discord",
        "slack" => "fa-brands fa-slack",
        "mastodon" => "fa-brands fa-mastodon",
        "globe" => "fa-solid fa-globe",
        _ => "fa-solid fa-link",
    }
}

const SITE_TEMPLATE: &str = r##"<!doctype html>
<html lang="{{ default_lang }}" data-theme="light">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{{ title }}</title>
<link rel="preconnect" href="https://fonts.googleapis.com">
<link rel="preconnect" href="https://fonts.gstatic.com" crossorigin>
<link href="https://fonts.googleapis.com/css2?family=Inter:wght@400;600;700&family=JetBrains+Mono:wght@400;600&display=swap" rel="stylesheet">
<link rel="stylesheet" href="https://www.w3schools.com/w3css/4/w3.css">
<link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.5.2/css/all.min.css" crossorigin="anonymous" referrerpolicy="no-referrer">
<style>{{ css | safe }}</style>
</head>
<body>
<header class="doku-header">
  <div class="doku-container">
    <div class="brand">{% if logo %}<img src="{{ logo }}" alt="logo">{% else %}<i class="fa-solid fa-book"></i>{% endif %}<span>{{ title }}</span></div>
    <nav class="doku-nav"><ul>{% for link in header_nav %}<li><a data-langlink="{{ default_lang }}" href="#{{ link.anchor }}">{{ link.text }}</a></li>{% endfor %}</ul></nav>
    <div class="doku-socials">{% for social in socials %}<a href="{{ social.url }}" title="{{ social.title }}"><i class="{{ social.icon }}"></i></a>{% endfor %}</div>
    {% if author %}<div class="author">{% if author.avatar %}<img src="{{ author.avatar }}" alt="{{ author.name or '' }}">{% endif %}<a href="{{ author.url or '#' }}">{{ author.name or '' }}</a></div>{% endif %}
    <div class="w3-dropdown-hover lang-dropdown">
      {% for lang in languages if lang.visible %}<button class="w3-button w3-round w3-small" id="lang-btn"><span class="flag-emoji" aria-hidden="true">{{ lang.flag }}</span> {{ lang.label }} <span class="lang-code">{{ lang.code | upper }}</span></button>{% endfor %}
      <div class="w3-dropdown-content w3-bar-block w3-card w3-white">
        {% for lang in languages %}<a class="w3-bar-item w3-button" data-pick-lang="{{ lang.code }}"><span class="flag-emoji" aria-hidden="true">{{ lang.flag }}</span> {{ lang.label }} <span class="lang-code">{{ lang.code | upper }}</span></a>{% endfor %}
      </div>
    </div>
    <button class="w3-button w3-round w3-small theme-toggle" title="Toggle theme"><i class="fa-solid fa-moon"></i></button>
  </div>
</header>
<main class="doku-main w3-animate-opacity">
  <aside class="toc">{% for lang in languages %}<ul data-lang="{{ lang.code }}" style="display:{% if lang.visible %}block{% else %}none{% endif %}">{{ lang.toc_html | safe }}</ul>{% endfor %}</aside>
  <article class="doku-content">{% for lang in languages %}<div data-lang="{{ lang.code }}" style="display:{% if lang.visible %}block{% else %}none{% endif %}">{{ lang.body_html | safe }}</div>{% endfor %}</article>
</main>
<script>
(function () {
  var boot = {{ boot_json | safe }};
  var key = 'doku-lang';
  function esc(s) {
    return String(s).replace(/[&<>"]/g, function (c) {
      return { '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;' }[c];
    });
  }
  function find(code) {
    for (var i = 0; i < boot.languages.length; i++) {
      if (boot.languages[i].code === code) return boot.languages[i];
    }
    return null;
  }
  function setLang(code) {
    var lang = find(code) || find(boot.defaultLang);
    if (!lang) return;
    code = lang.code;
    document.documentElement.setAttribute('lang', code);
    document.querySelectorAll('[data-lang]').forEach(function (el) {
      el.style.display = el.getAttribute('data-lang') === code ? 'block' : 'none';
    });
    var ul = document.querySelector('nav.doku-nav ul');
    if (ul) {
      ul.innerHTML = (boot.navByLang[code] || []).map(function (n) {
        return '<li><a data-langlink="' + esc(code) + '" href="#' + esc(n.anchor) + '">' + esc(n.text) + '</a></li>';
      }).join('');
    }
    var btn = document.getElementById('lang-btn');
    if (btn) {
      btn.innerHTML = '<span class="flag-emoji" aria-hidden="true">' + (boot.flags[code] || '') + '</span> ' +
        esc(lang.label) + ' <span class="lang-code">' + esc(code.toUpperCase()) + '</span>';
    }
    try { localStorage.setItem(key, code); } catch (e) {}
  }
  var saved = null;
  try { saved = localStorage.getItem(key); } catch (e) {}
  setLang(saved || boot.defaultLang);
  document.querySelectorAll('[data-pick-lang]').forEach(function (a) {
    a.addEventListener('click', function (e) {
      e.preventDefault();
      setLang(a.getAttribute('data-pick-lang'));
    });
  });
})();
</script>
<script type="module">
const root = document.documentElement;
const key = 'doku-theme';
const setTheme = (theme) => {
  root.setAttribute('data-theme', theme);
  const icon = document.querySelector('.theme-toggle i');
  if (icon) {
    icon.classList.toggle('fa-sun', theme === 'dark');
    icon.classList.toggle('fa-moon', theme !== 'dark');
  }
};
setTheme(localStorage.getItem(key) === 'dark' ? 'dark' : 'light');
document.querySelectorAll('.theme-toggle').forEach((btn) => btn.addEventListener('click', () => {
  const next = root.getAttribute('data-theme') === 'dark' ? 'light' : 'dark';
  setTheme(next);
  localStorage.setItem(key, next);
}));
</script>
<script src="{{ script_file }}" type="module"></script>
</body>
</html>
"##;

const DOKU_INDEX_TEMPLATE: &str = r##"<!doctype html>
<html lang="{{ default_lang }}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{{ title }} - Doku</title>
<script src="{{ runtime_file }}"></script>
<link rel="stylesheet" href="https://www.w3schools.com/w3css/4/w3.css">
<link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.5.2/css/all.min.css">
<style>body{font-family:Inter,system-ui,-apple-system,"Segoe UI",Roboto,Helvetica,Arial,sans-serif;max-width:1100px;margin:0 auto;padding:24px}</style>
</head>
<body>
<header class="w3-padding">{{ title }} <span class="w3-small w3-text-gray">(Doku client render)</span></header>
<nav class="w3-bar w3-small">{% for link in links %}<a class="w3-bar-item w3-button" href="{{ link.href }}">{{ link.label }}</a>{% endfor %}</nav>
{% if first_src %}<doku src="{{ first_src }}"></doku>{% else %}<div>No pages</div>{% endif %}
</body>
</html>
"##;

const STANDALONE_TEMPLATE: &str = r##"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{{ title }}</title>
<style>{{ css | safe }}</style>
</head>
<body>
<main class="doku">
{{ content | safe }}
</main>
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::*;

    fn site_context() -> SiteContext {
        SiteContext {
            title: "My <Docs>".to_string(),
            default_lang: "en".to_string(),
            css: ".x{color:red}".to_string(),
            logo: None,
            socials: vec![SocialLink {
                url: "https://github.com/me".to_string(),
                title: "github".to_string(),
                icon: social_icon_class("github").to_string(),
            }],
            author: Some(Author {
                name: Some("Ann".to_string()),
                url: None,
                avatar: None,
            }),
            header_nav: vec![NavLink {
                text: "Intro".to_string(),
                anchor: "section-en-0".to_string(),
            }],
            languages: vec![
                LanguageView {
                    code: "en".to_string(),
                    label: "English".to_string(),
                    flag: flag_emoji("en").to_string(),
                    visible: true,
                    toc_html: "<li>en toc</li>".to_string(),
                    body_html: "<section>en body</section>".to_string(),
                },
                LanguageView {
                    code: "ru".to_string(),
                    label: "Русский".to_string(),
                    flag: flag_emoji("ru").to_string(),
                    visible: false,
                    toc_html: "<li>ru toc</li>".to_string(),
                    body_html: "<section>ru body</section>".to_string(),
                },
            ],
            boot_json: "{}".to_string(),
            script_file: "index_build_x.js".to_string(),
        }
    }

    #[test]
    fn renders_site_document() {
        let engine = TemplateEngine::new();

        let html = engine.render("site.html", &site_context()).unwrap();

        assert!(html.contains("<title>My &lt;Docs&gt;</title>"));
        assert!(html.contains("<style>.x{color:red}</style>"));
        assert!(html.contains("<section>en body</section>"));
        assert!(html.contains("<section>ru body</section>"));
        assert!(html.contains("fa-brands fa-github"));
        assert!(html.contains("fa-solid fa-book"));
        assert!(html.contains("Ann</a>"));
        assert!(html.contains("href=\"#section-en-0\">Intro</a>"));
    }

    #[test]
    fn only_default_language_is_visible() {
        let engine = TemplateEngine::new();

        let html = engine.render("site.html", &site_context()).unwrap();

        assert!(html.contains("<ul data-lang=\"en\" style=\"display:block\">"));
        assert!(html.contains("<ul data-lang=\"ru\" style=\"display:none\">"));
        assert!(html.contains("<div data-lang=\"en\" style=\"display:block\">"));
        assert!(html.contains("<div data-lang=\"ru\" style=\"display:none\">"));
        assert_eq!(html.matches("style=\"display:block\"").count(), 2);
        assert_eq!(html.matches("id=\"lang-btn\"").count(), 1);
    }

    #[test]
    fn renders_doku_index_without_pages() {
        let engine = TemplateEngine::new();
        let context = DokuIndexContext {
            title: "Site".to_string(),
            default_lang: "en".to_string(),
            runtime_file: "dokujs.js".to_string(),
            links: vec![],
            first_src: None,
        };

        let html = engine.render("doku_index.html", &context).unwrap();

        assert!(html.contains("<div>No pages</div>"));
        assert!(!html.contains("<doku "));
    }

    #[test]
    fn renders_standalone_document() {
        let engine = TemplateEngine::new();
        let context = StandaloneContext {
            title: "A & B".to_string(),
            css: String::new(),
            content: "<p>Hi</p>".to_string(),
        };

        let html = engine.render("standalone.html", &context).unwrap();

        assert!(html.contains("<title>A &amp; B</title>"));
        assert!(html.contains("<main class=\"doku\">\n<p>Hi</p>\n</main>"));
    }

    #[test]
    fn script_json_escapes_closing_tags() {
        let json = script_json(&serde_json::json!({"t": "</script>"})).unwrap();
        assert_eq!(json, r#"{"t":"<\/script>"}"#);
    }

    #[test]
    fn unknown_codes_get_fallbacks() {
        assert_eq!(flag_emoji("EN"), "🇺🇸");
        assert_eq!(flag_emoji("xx"), "🏳\u{fe0f}");
        assert_eq!(social_icon_class("myspace"), "fa-solid fa-link");
    }
}
