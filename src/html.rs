use crate::highlight::{highlight, HighlightOptions, Language};

use anyhow::Result;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Serializer, Value};

const CHEVRON_UP_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 16 16"><title>upchevron</title><path fill="#FFFFFF" d="M8,5.1l-7.3,7.3L0,11.6l8-8l8,8l-0.7,0.7L8,5.1z"/><rect fill="none" width="16" height="16"/></svg>"##;

const CHEVRON_MARKER: &str = "%CHEVRON_URI%";

/// Theme class set on `<body>`. An editor webview replaces it with its own;
/// a browser opening the file keeps it, so the token colours still apply.
pub const DEFAULT_THEME_CLASS: &str = "vscode-light";

const STYLE: &str = r#"
        body.vscode-light,
        body.vscode-dark,
        body.vscode-high-contrast {
            background-color: inherit;
        }

        pre .hljs-comment {
            color: #57A64A;
            font-style: italic;
        }

        .vscode-light pre .hljs-string { color: #718c00; }
        .vscode-dark pre .hljs-string { color: #b5bd68; }
        .vscode-high-contrast pre .hljs-string { color: #d1f1a9; }

        .vscode-light pre .hljs-key,
        .vscode-light pre .hljs-key .hljs-string { color: #eab700; }
        .vscode-dark pre .hljs-key,
        .vscode-dark pre .hljs-key .hljs-string { color: #f0c674; }
        .vscode-high-contrast pre .hljs-key,
        .vscode-high-contrast pre .hljs-key .hljs-string { color: #ffeead; }

        .vscode-light pre .hljs-numeric,
        .vscode-light pre .hljs-language { color: #f5871f; }
        .vscode-dark pre .hljs-numeric,
        .vscode-dark pre .hljs-language { color: #de935f; }
        .vscode-high-contrast pre .hljs-numeric,
        .vscode-high-contrast pre .hljs-language { color: #ffc58f; }

        .vscode-light pre .hljs-invalid,
        .vscode-dark pre .hljs-invalid,
        .vscode-high-contrast pre .hljs-invalid { color: #f44747; }

        pre .hljs-emphasis { font-style: italic; }
        pre .hljs-strong { font-weight: bold; }

        code {
            display: block;
            background: inherit;
            font-family: Menlo, Monaco, Consolas, "Droid Sans Mono", "Courier New", monospace, "Droid Sans Fallback";
            font-size: 13px;
            line-height: 1.5;
            padding: 10px;
            white-space: pre-wrap;
            word-break: break-all;
        }

        .vscode-light pre code { color: #4d4d4c; }
        .vscode-dark pre code { color: #c5c8c6; }
        .vscode-high-contrast pre code { color: white; }

        code .line {
            display: inline-block;
            position: relative;
            padding-left: calc(2ch + 20px);
        }

        code .line.hidden-line { display: none; }

        code .line:after { content: ' '; }

        code .line:before {
            box-sizing: content-box;
            display: inline-block;
            position: absolute;
            top: 0;
            bottom: 0;
            text-align: right;
            width: 2ch;
            content: attr(start);
            padding-right: 9px;
            padding-left: 9px;
            margin-left: calc(-2ch + -30px);
            margin-right: 9px;
            color: #787878;
            background-color: inherit;
        }

        a { color: #4080D0; text-decoration: none; }
        a:hover { color: #4080D0; text-decoration: underline; }

        #scroll-to-top {
            position: fixed;
            width: 40px;
            height: 40px;
            right: 25px;
            bottom: 25px;
            background-color: #444444;
            border-radius: 50%;
            cursor: pointer;
            box-shadow: 1px 1px 1px rgba(0,0,0,.25);
        }

        #scroll-to-top:hover {
            background-color: #007acc;
            box-shadow: 2px 2px 2px rgba(0,0,0,.25);
        }

        body.vscode-light #scroll-to-top { background-color: #949494; }
        body.vscode-light #scroll-to-top:hover { background-color: #007acc; }

        body.vscode-high-contrast #scroll-to-top {
            background-color: black;
            border: 2px solid #6fc3df;
            box-shadow: none;
        }
        body.vscode-high-contrast #scroll-to-top:hover { background-color: #007acc; }

        #scroll-to-top span.icon::before {
            content: "";
            background: url('%CHEVRON_URI%');
            width: 1.2rem;
            height: 1.2rem;
            position: absolute;
            left: calc(50% - 1.2rem / 2);
            top: calc(50% - 1.2rem / 2);
        }
"#;

fn chevron_data_uri() -> String {
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(CHEVRON_UP_SVG))
}

/// `serde_json::to_string_pretty` with a configurable indent.
pub fn to_json_string(value: &Value, indent: usize) -> serde_json::Result<String> {
    let indent = " ".repeat(indent);
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(indent.as_bytes()));
    value.serialize(&mut ser)?;
    // serde_json only ever writes valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Builds the panel document for a response. Pure: equal input gives
/// byte-identical output.
pub fn webview_content(response: &Value) -> Result<String> {
    let formatted = highlight(
        &to_json_string(response, 2)?,
        &HighlightOptions {
            language: Language::Json,
            start: 1,
        },
    )?;
    let style = STYLE.replace(CHEVRON_MARKER, &chevron_data_uri());

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <style>{style}    </style>
    <title>GraphQL Response</title>
</head>
<body class="{DEFAULT_THEME_CLASS}">
    <pre><code>{formatted}</code></pre>
</body>
</html>
"#
    ))
}
