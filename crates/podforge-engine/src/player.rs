//! Embeddable audio-player fragment for audio citations.

/// Build a self-contained HTML fragment with a styled audio player and a
/// download link. Colors follow the host's light/dark preference via CSS
/// variables so the embed blends into either theme.
pub fn audio_player_html(content_url: &str, filename: &str) -> String {
    format!(
        r#"<style>
    :root {{
        --bg-color: #ffffff;
        --text-color: #1f2937;
        --heading-color: #111827;
        --link-color: #3b82f6;
        --link-hover-color: #2563eb;
    }}

    @media (prefers-color-scheme: dark) {{
        :root {{
            --bg-color: #1f2937;
            --text-color: #e5e7eb;
            --heading-color: #f9fafb;
            --link-color: #60a5fa;
            --link-hover-color: #93c5fd;
        }}
    }}

    .podcast-container {{
        padding: 10px 20px 20px 20px;
        background-color: var(--bg-color);
        color: var(--text-color);
        border-radius: 8px;
        font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Roboto', sans-serif;
    }}

    .podcast-header {{
        display: flex;
        justify-content: space-between;
        align-items: center;
        margin-bottom: 15px;
        gap: 10px;
    }}

    .podcast-heading {{
        margin: 0;
        color: var(--heading-color);
        font-size: 1.125rem;
        font-weight: 600;
    }}

    .podcast-audio {{
        width: 100%;
        border-radius: 4px;
    }}

    .podcast-link {{
        color: var(--link-color);
        text-decoration: none;
        font-size: 0.875rem;
        white-space: nowrap;
    }}

    .podcast-link:hover {{
        color: var(--link-hover-color);
        text-decoration: underline;
    }}
</style>

<div class="podcast-container">
    <div class="podcast-header">
        <h3 class="podcast-heading">Podcast Audio Player</h3>
        <a href="{content_url}" download="{filename}" class="podcast-link">
            Download
        </a>
    </div>
    <audio controls class="podcast-audio">
        <source src="{content_url}" type="audio/wav">
        Your browser does not support the audio element.
    </audio>
</div>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_embeds_url_and_filename() {
        let html = audio_player_html("/api/v1/files/abc/content", "Podcast_audio.wav");
        assert!(html.contains(r#"<source src="/api/v1/files/abc/content" type="audio/wav">"#));
        assert!(html.contains(r#"download="Podcast_audio.wav""#));
        assert!(html.contains("<audio controls"));
        assert!(html.contains("prefers-color-scheme: dark"));
    }
}
