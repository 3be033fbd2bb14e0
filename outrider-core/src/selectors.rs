//! Selector catalog for the people-search and messaging surfaces.
//!
//! Everything the engine knows about the site's DOM lives here, so a markup
//! change is a one-file fix and the rest of the engine stays testable with
//! scripted drivers.

/// Global search box on the authenticated feed; used as the session probe.
pub const SEARCH_INPUT: &str =
    r#"input[placeholder*="Search"], input[placeholder*="search"]"#;

pub const LOGIN_USERNAME: &str = "#username";
pub const LOGIN_PASSWORD: &str = "#password";
pub const LOGIN_SUBMIT: &str = r#"button[type="submit"]"#;

/// Title link of one search result entry; doubles as the page render marker.
pub const RESULT_TITLE_LINK: &str = r#"a[data-view-name="search-result-lockup-title"]"#;

pub const ADD_NOTE_BUTTON: &str = r#"button[aria-label="Add a note"]"#;
pub const NOTE_INPUT: &str = "#custom-message";
pub const SEND_INVITATION_BUTTON: &str = r#"button[aria-label="Send invitation"]"#;

pub const NEXT_PAGE_BUTTON: &str =
    r#"button[data-testid="pagination-controls-next-button-visible"]"#;

/// Close controls of the invite dialog, most specific first.
pub const OVERLAY_CLOSE: &str =
    r#"button[aria-label="Dismiss"], button[aria-label="Cancel"], button[aria-label="Close"]"#;

pub const CONVERSATION_ITEM: &str = "li.msg-conversations-container__convo-item";
pub const CONVERSATION_EDITOR: &str = r#".msg-form__contenteditable[contenteditable="true"]"#;
pub const CONVERSATION_SEND_BUTTON: &str = ".msg-form__send-button";

/// In-page scripts. Handle-scoped ones are function declarations run with
/// the element bound to `this`; page-scoped ones are plain expressions.
pub mod js {
    /// Text of the relationship control that lives three ancestors above
    /// the title link. Missing container degrades to empty text.
    pub const RELATIONSHIP_TEXT: &str = "function() { \
        const container = this.parentElement && this.parentElement.parentElement \
            && this.parentElement.parentElement.parentElement; \
        if (!container) return ''; \
        const control = container.querySelector('[data-view-name=\"relationship-building-button\"]'); \
        return control ? control.textContent.trim() : ''; \
    }";

    /// Click the nested anchor/button inside the relationship control.
    /// Returns whether anything clickable was found.
    pub const RELATIONSHIP_CLICK: &str = "function() { \
        const container = this.parentElement && this.parentElement.parentElement \
            && this.parentElement.parentElement.parentElement; \
        if (!container) return false; \
        const control = container.querySelector('[data-view-name=\"relationship-building-button\"]'); \
        if (!control) return false; \
        const clickable = control.querySelector('a,button'); \
        if (!clickable) return false; \
        clickable.click(); \
        return true; \
    }";

    /// Stable prefix of the conversation discovery expression, for drivers
    /// that dispatch on the script rather than a real DOM.
    pub const DISCOVER_CONVERSATIONS_PREFIX: &str =
        "(() => { const snippetLower = ";

    /// Collect `{id, name}` for every visible conversation whose latest
    /// snippet contains the target phrase. The id falls back to a
    /// name+snippet pair when the list item carries no DOM id.
    pub fn discover_conversations(snippet_lower: &str) -> String {
        format!(
            "(() => {{ const snippetLower = '{}'; \
             const results = []; \
             for (const item of document.querySelectorAll('li.msg-conversations-container__convo-item')) {{ \
                 if (!item || item.classList.contains('msg-conversation-card--occluded')) continue; \
                 const snippetNode = item.querySelector('.msg-conversation-card__message-snippet'); \
                 if (!snippetNode) continue; \
                 const snippet = (snippetNode.textContent || '').replace(/\\s+/g, ' ').trim(); \
                 if (!snippet || !snippet.toLowerCase().includes(snippetLower)) continue; \
                 const nameNode = item.querySelector('.msg-conversation-card__participant-names'); \
                 const name = (nameNode && nameNode.textContent || '').replace(/\\s+/g, ' ').trim(); \
                 if (!name) continue; \
                 results.push({{ id: item.getAttribute('id') || (name + '-' + snippet), name }}); \
             }} \
             return results; }})()",
            escape_js_single_quoted(snippet_lower)
        )
    }

    /// Click "Load more conversations" if present; returns whether it was.
    pub const CLICK_LOAD_MORE: &str = "(() => { \
        for (const b of document.querySelectorAll('button')) { \
            if ((b.textContent || '').includes('Load more conversations')) { b.click(); return true; } \
        } \
        return false; })()";

    /// Scroll the conversation list one viewport; returns whether the
    /// scroll position actually moved.
    pub const SCROLL_CONVERSATION_LIST: &str = "(() => { \
        const container = document.querySelector('.msg-conversations-container--inbox-shortcuts'); \
        if (!container) return false; \
        const list = container.querySelector('.msg-conversations-container__conversations-list') || container; \
        const before = list.scrollTop; \
        list.scrollTop = before + list.clientHeight; \
        if (list.scrollTop === before) { list.scrollTop = list.scrollHeight; } \
        return list.scrollTop !== before; })()";

    fn escape_js_single_quoted(value: &str) -> String {
        value.replace('\\', "\\\\").replace('\'', "\\'")
    }
}
