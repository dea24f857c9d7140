//! Starter project generation.

use std::fs;
use std::path::{Path, PathBuf};

use doku_markdown::html_escape;

use crate::builder::{write_file, BuildError};

/// Name used when none is given and the directory has no usable name.
const FALLBACK_NAME: &str = "doku-site";

/// Write a starter project into `dir`, overwriting existing files.
///
/// The project name defaults to the directory's name. Returns the written
/// files in creation order.
pub fn generate_project(dir: &Path, name: Option<&str>) -> Result<Vec<PathBuf>, BuildError> {
    fs::create_dir_all(dir)
        .map_err(|e| BuildError::WriteError(format!("{}: {}", dir.display(), e)))?;

    let name = match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => name.to_string(),
        None => project_name(dir),
    };

    let mut written = Vec::new();
    for (rel, contents) in starter_files(&name)? {
        let path = dir.join(rel);
        write_file(&path, &contents)?;
        tracing::debug!("Created {}", path.display());
        written.push(path);
    }

    tracing::info!("Created project '{}' in {}", name, dir.display());

    Ok(written)
}

fn project_name(dir: &Path) -> String {
    fs::canonicalize(dir)
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| FALLBACK_NAME.to_string())
}

fn starter_files(name: &str) -> Result<Vec<(&'static str, String)>, BuildError> {
    let quoted = serde_json::to_string(name).map_err(|e| BuildError::WriteError(e.to_string()))?;
    let config_json = serde_json::to_string_pretty(&serde_json::json!({
        "title": name,
        "buildIdPrefix": "build",
    }))
    .map_err(|e| BuildError::WriteError(e.to_string()))?;

    Ok(vec![
        ("doku.toml", DOKU_TOML.replace("{{title}}", &quoted)),
        ("version.yaml", VERSION_YAML.to_string()),
        ("config.json", format!("{}\n", config_json)),
        ("index.html", INDEX_HTML.replace("{{name}}", &html_escape(name))),
        ("src/result.yaml", RESULT_YAML.replace("{{title}}", &quoted)),
        ("src/intro.md", INTRO_MD.replace("{{name}}", name)),
        ("src/chapter1.md", CHAPTER1_MD.to_string()),
        ("src/intro.ru.md", INTRO_RU_MD.replace("{{name}}", name)),
        ("src/chapter1.ru.md", CHAPTER1_RU_MD.to_string()),
        ("src/assets/logo.svg", LOGO_SVG.to_string()),
    ])
}

const DOKU_TOML: &str = r#"title = {{title}}

[author]
name = "Your Name"

[build]
minify = true
"#;

const VERSION_YAML: &str = "version: 0.1.0\nbuild: dev\n";

const INDEX_HTML: &str = r#"<!doctype html>
<html>
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{name}}</title>
  <style>body{font-family:system-ui,-apple-system,"Segoe UI",Roboto,Helvetica,Arial,sans-serif;max-width:800px;margin:40px auto;padding:0 16px;line-height:1.6}</style>
</head>
<body>
  <h1>{{name}}</h1>
  <p>This is a Doku project. Edit Markdown files in <code>src/</code> and navigation in <code>src/result.yaml</code>. Then run:</p>
  <pre><code>doku build</code></pre>
  <p>Open the generated file in <code>res/</code> named <code>index_&lt;buildid&gt;.html</code>.</p>
  <hr>
  <p>To embed a <code>.doku</code> file directly in a website, include <code>dokujs.js</code> and add:</p>
  <pre><code>&lt;script src="/path/to/dokujs.js"&gt;&lt;/script&gt;
&lt;doku src="/path/to/file.doku"&gt;&lt;/doku&gt;</code></pre>
</body>
</html>
"#;

const RESULT_YAML: &str = r##"title: {{title}}
repo: https://github.com/your/repo
author:
  name: Your Name
  url: https://example.com
  avatar: https://avatars.githubusercontent.com/u/9919?v=4
theme:
  primary: "#0f62fe"
  accent: "#f1c21b"
logo: assets/logo.svg
languages:
  - code: en
    label: English
  - code: ru
    label: Русский
socials:
  - icon: github
    url: https://github.com/your
  - icon: x
    url: https://x.com/your
nav:
  en:
    - text: Introduction
      file: intro.md
    - text: First Chapter
      file: chapter1.md
  ru:
    - text: Введение
      file: intro.ru.md
    - text: Первая глава
      file: chapter1.ru.md
"##;

const INTRO_MD: &str = r#"---
title: Introduction
---
# Welcome to {{name}}

This is your new Doku project. Edit files in `src/` and manage navigation and socials in `src/result.yaml`.

Code sample:

```js
function hello(name) {
  console.log('Hello, ' + name);
}
hello('Doku');
```
"#;

const CHAPTER1_MD: &str = r#"---
title: First Chapter
---
# First Steps

Write your guide content in Markdown within .md files.

- Use `src/result.yaml` to control nav and theme
- Use frontmatter in each page to define `title`
"#;

const INTRO_RU_MD: &str = r#"---
title: Введение
---
# Добро пожаловать в {{name}}

Это ваш новый проект Doku. Редактируйте файлы в каталоге `src/` и управляйте навигацией и соцсетями в `src/result.yaml`.

Пример кода:

```js
function hello(name) {
  console.log('Привет, ' + name);
}
hello('Doku');
```
"#;

const CHAPTER1_RU_MD: &str = r#"---
title: Первая глава
---
# Первые шаги

Пишите контент руководства в Markdown (.md).

- Используйте `src/result.yaml` для управления навигацией и темой
- Используйте фронтматтер для задания `title` на странице
"#;

const LOGO_SVG: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="128" height="128" viewBox="0 0 128 128">
  <defs>
    <linearGradient id="g" x1="0" x2="1" y1="0" y2="1">
      <stop offset="0%" stop-color="#0f62fe"/>
      <stop offset="100%" stop-color="#f1c21b"/>
    </linearGradient>
  </defs>
  <rect rx="16" ry="16" width="128" height="128" fill="url(#g)"/>
  <g fill="#fff">
    <path d="M42 54h54v42a10 10 0 0 1-10 10H42V54z" opacity=".95"/>
    <rect x="48" y="62" width="40" height="6" rx="3"/>
    <rect x="48" y="74" width="34" height="6" rx="3"/>
    <rect x="48" y="86" width="28" height="6" rx="3"/>
  </g>
</svg>
"##;
