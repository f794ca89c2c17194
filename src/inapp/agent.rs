//! User-Agent classification for embedded app browsers.

/// Case-insensitive substrings that identify a known in-app browser.
pub const IN_APP_MARKERS: &[&str] = &[
	"micromessenger",
	"weibo",
	"qq/",
	"mqqbrowser",
	"alipay",
	"dingtalk",
	"tiktok",
	"bytedance",
	"instagram",
	"fb_iab",
	"fb_an",
	"twitter",
	"line/",
	"snapchat",
];

const WEBVIEW_MARKERS: [&str; 2] = ["wv", "webview"];
const FULL_BROWSER_MARKERS: [&str; 2] = ["chrome/", "safari/"];

/// Returns true when `user_agent` belongs to a WebView that cannot talk to `window.opener`.
///
/// A generic `wv`/`webview` token only counts when no `chrome/` or `safari/` token is
/// present, since Android Chrome custom tabs carry both.
pub fn is_in_app_browser(user_agent: &str) -> bool {
	let agent = user_agent.to_ascii_lowercase();

	if IN_APP_MARKERS.iter().any(|marker| agent.contains(marker)) {
		return true;
	}

	WEBVIEW_MARKERS.iter().any(|marker| agent.contains(marker))
		&& !FULL_BROWSER_MARKERS.iter().any(|marker| agent.contains(marker))
}
