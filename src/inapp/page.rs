//! Self-contained redirect page served to in-app browsers.

// self
use crate::_prelude::*;

/// Milliseconds before the page retries the navigation.
pub const RETRY_DELAY_MS: u32 = 2000;

const MESSAGE_NEW_USER: &str = "Authentication successful. Redirecting to complete registration...";
const MESSAGE_EXISTING_USER: &str = "Authentication successful. Redirecting...";
const MANUAL_LINK: &str = "Click here if not redirected";

/// Escapes text for use in HTML element content and double- or single-quoted attributes.
pub fn escape_html(text: &str) -> String {
	let mut escaped = String::with_capacity(text.len());

	for c in text.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&quot;"),
			'\'' => escaped.push_str("&#39;"),
			_ => escaped.push(c),
		}
	}

	escaped
}

/// Branding applied to the redirect page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageColors {
	/// Accent and button background color.
	pub button: String,
	/// Button text color.
	pub button_text: String,
}

/// Renders the page that navigates the top-level window to `target`.
///
/// Navigates immediately, retries once after [`RETRY_DELAY_MS`], and shows a manual link.
pub fn render(target: &Url, new_user: bool, colors: &PageColors) -> String {
	let message = if new_user { MESSAGE_NEW_USER } else { MESSAGE_EXISTING_USER };
	let href = escape_html(target.as_str());
	// JSON string literal, with `</` broken up so it cannot close the script element.
	let script_target = Value::String(target.as_str().to_owned()).to_string().replace("</", "<\\/");
	let accent = escape_html(&colors.button);
	let accent_text = escape_html(&colors.button_text);

	format!(
		r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Authentication Successful</title>
<style>
* {{ box-sizing: border-box; margin: 0; padding: 0; }}
body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Arial, sans-serif; display: flex; justify-content: center; align-items: center; min-height: 100vh; background: #ffffff; padding: 20px; }}
.container {{ text-align: center; max-width: 360px; width: 100%; padding: 40px 30px; }}
.checkmark {{ font-size: 3rem; margin-bottom: 1rem; color: {accent}; }}
.message {{ font-size: 1.1rem; margin-bottom: 1.5rem; color: #333; line-height: 1.5; }}
.spinner {{ width: 40px; height: 40px; border: 3px solid rgba(0,0,0,0.1); border-top-color: {accent}; border-radius: 50%; animation: spin 1s linear infinite; margin: 0 auto 1.5rem; }}
@keyframes spin {{ to {{ transform: rotate(360deg); }} }}
.manual-link a {{ display: inline-block; background: {accent}; color: {accent_text}; text-decoration: none; padding: 14px 32px; border-radius: 8px; font-size: 16px; font-weight: 500; }}
</style>
</head>
<body>
<div class="container">
<div class="checkmark">&#10003;</div>
<div class="message">{message}</div>
<div class="spinner"></div>
<div class="manual-link"><a href="{href}">{MANUAL_LINK}</a></div>
</div>
<script>
(function () {{
	var target = {script_target};
	window.location.href = target;
	setTimeout(function () {{ window.location.href = target; }}, {RETRY_DELAY_MS});
}})();
</script>
</body>
</html>
"#
	)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn colors() -> PageColors {
		PageColors { button: "#684ba6".into(), button_text: "#ffffff".into() }
	}

	#[test]
	fn escapes_markup_and_quotes() {
		assert_eq!(escape_html(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
	}

	#[test]
	fn page_links_and_retries_target() {
		let target = Url::parse("https://forum.example.com/?oauth_token=a%26b")
			.expect("URL fixture should parse.");
		let html = render(&target, true, &colors());

		assert!(html.contains(r#"href="https://forum.example.com/?oauth_token=a%26b""#));
		assert!(html.contains(r#"var target = "https://forum.example.com/?oauth_token=a%26b";"#));
		assert!(html.contains("}, 2000);"));
		assert!(html.contains("complete registration"));
		assert!(html.contains("color: #684ba6;"));
	}

	#[test]
	fn hostile_colors_are_escaped() {
		let target = Url::parse("https://forum.example.com").expect("URL fixture should parse.");
		let html = render(
			&target,
			false,
			&PageColors { button: "red;}</style><script>".into(), button_text: "#fff".into() },
		);

		assert!(!html.contains("</style><script>"));
		assert!(html.contains("Redirecting..."));
	}
}
