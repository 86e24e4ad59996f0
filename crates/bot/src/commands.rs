//! Text command table.
//!
//! Every inbound text message resolves against [`COMMANDS`]. Anything
//! unrecognized gets the help text, so the sender always learns the
//! vocabulary.

use meishi_config::{ProfileCard, ProfileConfig};

use meishi_line::{Action, ImageCarouselColumn, OutboundMessage, Template};

/// What command handlers get to work with.
pub struct CommandContext<'a> {
    pub profile: &'a ProfileConfig,
    /// Public base URL, for resolving site-relative image paths.
    pub base_url: &'a str,
}

type CommandHandler = fn(&CommandContext<'_>) -> Vec<OutboundMessage>;

/// Keyword-to-handler table, checked in order.
pub const COMMANDS: &[(&str, CommandHandler)] = &[
    ("profile", profile),
    ("github", github),
    ("experience", experience),
    ("skills", skills),
    ("interests", interests),
    ("life photo", life_photo),
];

/// Resolve a text message to its reply batch. Keywords match exactly,
/// case included; anything else gets the help reply.
#[must_use]
pub fn respond(text: &str, ctx: &CommandContext<'_>) -> Vec<OutboundMessage> {
    COMMANDS
        .iter()
        .find(|(keyword, _)| *keyword == text)
        .map_or_else(|| help(ctx), |(_, handler)| handler(ctx))
}

fn profile(ctx: &CommandContext<'_>) -> Vec<OutboundMessage> {
    vec![OutboundMessage::text(ctx.profile.bio.clone())]
}

fn github(ctx: &CommandContext<'_>) -> Vec<OutboundMessage> {
    let github = &ctx.profile.github;
    vec![OutboundMessage::template(
        format!("My github: {}", github.url),
        Template::Buttons {
            thumbnail_image_url: Some(resolve_url(ctx.base_url, &github.thumbnail)),
            title: Some(github.title.clone()),
            text: github.text.clone(),
            actions: vec![Action::uri(github.label.clone(), github.url.clone())],
        },
    )]
}

fn experience(ctx: &CommandContext<'_>) -> Vec<OutboundMessage> {
    vec![card_carousel(
        ctx,
        "My work and project experience",
        &ctx.profile.experience,
    )]
}

fn skills(ctx: &CommandContext<'_>) -> Vec<OutboundMessage> {
    vec![OutboundMessage::text(ctx.profile.skills.clone())]
}

fn interests(ctx: &CommandContext<'_>) -> Vec<OutboundMessage> {
    vec![OutboundMessage::text(ctx.profile.interests.clone())]
}

fn life_photo(ctx: &CommandContext<'_>) -> Vec<OutboundMessage> {
    vec![card_carousel(ctx, "My life photos", &ctx.profile.life_photos)]
}

fn help(ctx: &CommandContext<'_>) -> Vec<OutboundMessage> {
    vec![OutboundMessage::text(ctx.profile.help.clone())]
}

fn card_carousel(
    ctx: &CommandContext<'_>,
    alt_text: &str,
    cards: &[ProfileCard],
) -> OutboundMessage {
    let columns = cards
        .iter()
        .map(|card| {
            ImageCarouselColumn::new(
                resolve_url(ctx.base_url, &card.image),
                Action::message(card.label.clone(), card.text.clone()),
            )
        })
        .collect();
    OutboundMessage::template(alt_text, Template::ImageCarousel { columns })
}

/// Site-relative paths resolve against the public base URL; anything
/// already absolute passes through.
fn resolve_url(base_url: &str, path: &str) -> String {
    if path.starts_with('/') {
        format!("{}{path}", base_url.trim_end_matches('/'))
    } else {
        path.to_string()
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const BASE_URL: &str = "https://bot.example.com";

    fn respond_default(text: &str) -> Vec<OutboundMessage> {
        let profile = ProfileConfig::default();
        let ctx = CommandContext {
            profile: &profile,
            base_url: BASE_URL,
        };
        respond(text, &ctx)
    }

    fn only_text(messages: &[OutboundMessage]) -> String {
        let [OutboundMessage::Text { text }] = messages else {
            panic!("expected a single text message");
        };
        text.clone()
    }

    #[test]
    fn profile_replies_with_the_bio() {
        let text = only_text(&respond_default("profile"));
        assert!(text.starts_with("Hi, I am Eric Lin."));
    }

    #[rstest]
    #[case("GitHub")]
    #[case("GITHUB")]
    #[case(" github ")]
    #[case("\tgithub\n")]
    fn near_miss_keywords_fall_back_to_help(#[case] input: &str) {
        let text = only_text(&respond_default(input));
        assert!(text.contains("profile: my introduction"));
    }

    #[test]
    fn github_buttons_resolve_the_thumbnail() {
        let messages = respond_default("github");
        let [OutboundMessage::Template {
            template:
                Template::Buttons {
                    thumbnail_image_url,
                    actions,
                    ..
                },
            ..
        }] = &messages[..]
        else {
            panic!("expected a buttons template");
        };
        assert_eq!(
            thumbnail_image_url.as_deref(),
            Some("https://bot.example.com/static/buttons/9919.jpg")
        );
        assert!(
            matches!(&actions[..], [Action::Uri { uri, .. }] if uri == "https://github.com/ericlin03")
        );
    }

    #[test]
    fn experience_carousel_resolves_site_relative_images() {
        let messages = respond_default("experience");
        let [OutboundMessage::Template {
            template: Template::ImageCarousel { columns },
            ..
        }] = &messages[..]
        else {
            panic!("expected an image carousel");
        };
        assert_eq!(columns.len(), 3);
        assert_eq!(
            columns[0].image_url,
            "https://bot.example.com/static/buttons/CTBC.jpg"
        );
    }

    #[test]
    fn life_photo_keyword_contains_a_space() {
        let messages = respond_default("life photo");
        let [OutboundMessage::Template { alt_text, .. }] = &messages[..] else {
            panic!("expected a template message");
        };
        assert_eq!(alt_text, "My life photos");
    }

    #[test]
    fn skills_reply_keeps_its_bullet_lines() {
        let text = only_text(&respond_default("skills"));
        assert!(text.contains("● Programming Languages"));
    }

    #[test]
    fn unknown_text_falls_back_to_help() {
        let text = only_text(&respond_default("what can you do?"));
        assert!(text.contains("skills: what I can do"));
    }

    #[test]
    fn absolute_image_urls_pass_through() {
        assert_eq!(
            resolve_url(BASE_URL, "https://cdn.example.com/x.jpg"),
            "https://cdn.example.com/x.jpg"
        );
        assert_eq!(
            resolve_url("https://bot.example.com/", "/static/a.jpg"),
            "https://bot.example.com/static/a.jpg"
        );
    }
}
