//! The shell every page is rendered into: navigation bar, footer and the
//! floating chat widget. The markup lives in `templates/base.html`; page
//! templates extend it and carry a [`Layout`] as their `layout` field.

use super::content::{self, Footer, Navbar};
use crate::chat::prompts::WIDGET_TITLE;
use chrono::{Datelike, Utc};

pub struct Layout {
    pub title: &'static str,
    pub navbar: Navbar,
    pub footer: Footer,
    pub widget_title: &'static str,
}

impl Layout {
    pub fn new(title: &'static str, signed_in: bool) -> Self {
        Self {
            title,
            navbar: content::navbar(signed_in),
            footer: content::footer(Utc::now().year()),
            widget_title: WIDGET_TITLE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use askama::Template;

    #[derive(Template)]
    #[template(
        source = r#"{% extends "base.html" %}{% block content %}<p>{{ body }}</p>{% endblock %}"#,
        ext = "html"
    )]
    struct Shell {
        layout: Layout,
        body: &'static str,
    }

    fn shell(title: &'static str, signed_in: bool, body: &'static str) -> String {
        Shell {
            layout: Layout::new(title, signed_in),
            body,
        }
        .render()
        .unwrap()
    }

    #[test]
    fn test_page_includes_shell() {
        let html = shell("Hostel", false, "menu");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Hostel | AIverse SRM</title>"));
        assert!(html.contains("<p>menu</p>"));
        assert!(html.contains(">Login</a>"));
        assert!(html.contains("SRM Nagar, Kattankulathur - 603203"));
        assert!(html.contains("SRM Campus Assistant"));
        assert!(!html.contains("sign-out"));
    }

    #[test]
    fn test_signed_in_page_offers_sign_out() {
        let html = shell("Home", true, "");
        assert!(html.contains("id=\"sign-out\""));
        assert!(html.contains("fetch('/api/auth/logout'"));
        assert!(!html.contains(">Login</a>"));
        assert!(!html.contains("localStorage"));
    }

    #[test]
    fn test_page_content_is_escaped() {
        let html = shell("Home", false, "<script>alert('x')</script>");
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
