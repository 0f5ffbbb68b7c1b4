//! Server-rendered portfolio page.
//!
//! Every string that originates from configuration or an upstream is
//! escaped before it reaches the markup.

use axum::{extract::State, response::Html};
use folio_config::ProfileConfig;
use folio_types::{Fetched, NowPlaying, NowReading};
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use rand::seq::SliceRandom as _;
use std::sync::Arc;

use crate::AppState;

/// Shown in place of a widget that has nothing to display.
pub const FALLBACK: &str = "I'm not.";

const STYLE: &str = "body{margin:0;min-height:100vh;background:#0a0a0a;color:#f1f5f9;\
font-family:system-ui,sans-serif}main{display:flex;flex-wrap:wrap;gap:.5rem;padding:3rem;\
align-items:flex-start}section{width:250px;border:1px solid #262626;border-radius:.5rem;\
background:#0a0a0a;padding:.5rem}h1,h2{margin:0 0 .5rem}h2{font-size:.875rem;color:#3f3f46}\
img{width:100%;border-radius:.5rem}.dot{display:inline-block;width:.5rem;height:.5rem;\
border-radius:50%;margin-right:.5rem}.on{background:#65a30d}.off{background:#e11d48}\
.links a{color:#71717a;margin-right:.75rem}";

/// `"{artists} - {track}"`, or [`FALLBACK`] when nothing is playing.
#[must_use]
pub fn listening_line(playing: &Fetched<NowPlaying>) -> String {
    match playing {
        Fetched::Ready(track) => format!("{} - {}", track.artists_line(), track.track_name),
        Fetched::Unavailable(_) => FALLBACK.to_string(),
    }
}

fn listening_block(playing: &Fetched<NowPlaying>) -> String {
    let mut out = String::from("<section class=\"listening\">");
    if let Some(track) = playing.ready() {
        let art = track.album_art_url.as_deref().map_or_else(String::new, |src| {
            format!("<img src=\"{}\" alt=\"Album cover\">", attr(src))
        });
        match track.external_url.as_deref() {
            Some(href) => out.push_str(&format!("<a href=\"{}\">{art}</a>", attr(href))),
            None => out.push_str(&art),
        }
    }
    let state = if playing.is_ready() { "on" } else { "off" };
    out.push_str(&format!(
        "<h2>Currently listening...</h2><p><span class=\"dot {state}\"></span>\
         <span class=\"line\">{}</span></p></section>",
        text(&listening_line(playing))
    ));
    out
}

fn reading_block(reading: &Fetched<NowReading>) -> String {
    let mut out = String::from("<section class=\"reading\">");
    let Some(book) = reading.ready() else {
        out.push_str(&format!(
            "<h2>Currently reading...</h2><p>{}</p></section>",
            text(FALLBACK)
        ));
        return out;
    };
    if let Some(cover) = book.cover_url.as_deref() {
        out.push_str(&format!(
            "<a href=\"{}\"><img src=\"{}\" alt=\"Book cover\"></a>",
            attr(&book.source_url),
            attr(cover)
        ));
    }
    out.push_str("<h2>Currently reading...</h2>");
    let title = book.title.as_deref().unwrap_or("Untitled");
    out.push_str(&format!("<p class=\"title\">{}</p>", text(title)));
    if let Some(author) = book.author_name.as_deref() {
        out.push_str(&format!("<small class=\"author\">{}</small>", text(author)));
    }
    out.push_str("</section>");
    out
}

/// Render the full page from a profile snapshot and both widget results.
#[must_use]
pub fn render(
    profile: &ProfileConfig,
    fact: Option<&str>,
    playing: &Fetched<NowPlaying>,
    reading: &Fetched<NowReading>,
) -> String {
    let mut out = format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>{name}</title><style>{STYLE}</style></head><body><main>\
         <section class=\"profile\"><h1>{name}</h1><h2>{tagline}</h2></section>",
        name = text(&profile.name),
        tagline = text(&profile.tagline),
    );
    if let Some(fact) = fact {
        out.push_str(&format!(
            "<section class=\"fact\"><h2>Did you know?</h2><p>{}</p></section>",
            text(fact)
        ));
    }
    out.push_str(&listening_block(playing));
    out.push_str(&reading_block(reading));
    if !profile.links.is_empty() {
        out.push_str("<section class=\"links\">");
        for link in &profile.links {
            out.push_str(&format!(
                "<a href=\"{}\">{}</a>",
                attr(&link.url),
                text(&link.label)
            ));
        }
        out.push_str("</section>");
    }
    out.push_str("</main></body></html>");
    out
}

/// `GET /`: run both widget pipelines concurrently and render the page.
pub(crate) async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let (playing, reading) = tokio::join!(state.now_playing.current(), state.now_reading.current());
    let config = state.config.load();
    let fact = config.profile.facts.choose(&mut rand::thread_rng());
    Html(render(
        &config.profile,
        fact.map(String::as_str),
        &playing,
        &reading,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_config::LinkConfig;

    fn track() -> NowPlaying {
        NowPlaying {
            track_name: "Dayvan Cowboy".into(),
            artist_names: vec!["Boards of Canada".into()],
            album_art_url: Some("https://i.scdn.co/image/abc".into()),
            external_url: Some("https://open.spotify.com/track/x".into()),
            is_playing: true,
        }
    }

    fn book() -> NowReading {
        NowReading {
            title: Some("Piranesi".into()),
            author_name: Some("Susanna Clarke".into()),
            cover_url: None,
            source_url: "https://www.goodreads.com/book/show/50202953".into(),
        }
    }

    fn unavailable<T>() -> Fetched<T> {
        Fetched::Unavailable("nothing".into())
    }

    #[test]
    fn test_listening_line() {
        assert_eq!(
            listening_line(&Fetched::Ready(track())),
            "Boards of Canada - Dayvan Cowboy"
        );
        assert_eq!(listening_line(&unavailable()), "I'm not.");
    }

    #[test]
    fn test_listening_line_multiple_artists() {
        let mut t = track();
        t.artist_names.push("Aphex Twin".into());
        assert_eq!(
            listening_line(&Fetched::Ready(t)),
            "Boards of Canada, Aphex Twin - Dayvan Cowboy"
        );
    }

    #[test]
    fn test_render_both_unavailable() {
        let html = render(&ProfileConfig::default(), None, &unavailable(), &unavailable());
        assert!(html.contains("<span class=\"line\">I'm not.</span>"));
        assert!(html.contains("<h2>Currently reading...</h2><p>I'm not.</p>"));
        assert!(html.contains("dot off"));
        assert!(!html.contains("Did you know?"));
    }

    #[test]
    fn test_render_ready_widgets() {
        let html = render(
            &ProfileConfig::default(),
            Some("Octopuses have three hearts."),
            &Fetched::Ready(track()),
            &Fetched::Ready(book()),
        );
        assert!(html.contains("Boards of Canada - Dayvan Cowboy"));
        assert!(html.contains("href=\"https://open.spotify.com/track/x\""));
        assert!(html.contains("<p class=\"title\">Piranesi</p>"));
        assert!(html.contains("<small class=\"author\">Susanna Clarke</small>"));
        assert!(html.contains("Octopuses have three hearts."));
        assert!(html.contains("dot on"));
    }

    #[test]
    fn test_render_escapes_upstream_and_profile_text() {
        let profile = ProfileConfig {
            name: "<script>alert(1)</script>".into(),
            links: vec![LinkConfig {
                label: "Me & co".into(),
                url: "https://example.com/?a=\"b\"".into(),
            }],
            ..ProfileConfig::default()
        };
        let mut t = track();
        t.track_name = "<b>Loud</b>".into();
        let html = render(&profile, None, &Fetched::Ready(t), &unavailable());
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("&lt;b&gt;Loud&lt;/b&gt;"));
        assert!(html.contains("Me &amp; co"));
        assert!(!html.contains("a=\"b\""));
    }

    #[test]
    fn test_render_book_without_title() {
        let mut b = book();
        b.title = None;
        b.author_name = None;
        let html = render(&ProfileConfig::default(), None, &unavailable(), &Fetched::Ready(b));
        assert!(html.contains("<p class=\"title\">Untitled</p>"));
        assert!(!html.contains("class=\"author\""));
    }
}
