//! Config schema (server, line, media, profile).

use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MeishiConfig {
    pub server: ServerConfig,
    pub line: LineConfig,
    pub media: MediaConfig,
    pub profile: ProfileConfig,
}

/// Webhook server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to. Defaults to "127.0.0.1".
    pub bind: String,
    /// Port to listen on. Defaults to 8080.
    pub port: u16,
    /// Public base URL this bot is reachable at. Media and template
    /// image links are built from it, so it must be what the platform
    /// sees, not the bind address.
    pub base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".into(),
            port: 8080,
            base_url: "http://localhost:8080".into(),
        }
    }
}

/// Messaging platform credentials and endpoints.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LineConfig {
    /// Channel secret, used to verify webhook signatures.
    #[serde(serialize_with = "serialize_secret")]
    pub channel_secret: Secret<String>,

    /// Channel access token for the reply and content APIs.
    #[serde(serialize_with = "serialize_secret")]
    pub channel_token: Secret<String>,

    /// Reply API base URL.
    pub api_base: String,

    /// Content (blob) API base URL.
    pub blob_base: String,
}

impl std::fmt::Debug for LineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineConfig")
            .field("channel_secret", &"[REDACTED]")
            .field("channel_token", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("blob_base", &self.blob_base)
            .finish()
    }
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            channel_secret: Secret::new(String::new()),
            channel_token: Secret::new(String::new()),
            api_base: "https://api.line.me".into(),
            blob_base: "https://api-data.line.me".into(),
        }
    }
}

/// Inbound media handling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Directory downloaded content is written to and served from.
    pub download_dir: String,
    /// Directory of shipped static assets (template thumbnails).
    pub static_dir: String,
    /// ImageMagick `convert` binary used for preview downscaling.
    pub convert_path: String,
    /// `ffmpeg` binary used for video frame extraction.
    pub ffmpeg_path: String,
    /// Hard cap on a single transform tool run, in seconds.
    pub transform_timeout_secs: u64,
    /// Timeout for a single content download, in seconds.
    pub fetch_timeout_secs: u64,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            download_dir: "downloaded".into(),
            static_dir: "static".into(),
            convert_path: "convert".into(),
            ffmpeg_path: "ffmpeg".into(),
            transform_timeout_secs: 20,
            fetch_timeout_secs: 30,
        }
    }
}

/// Card shown in an image carousel: a thumbnail plus the text sent
/// back when it is tapped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileCard {
    /// Site-relative path (resolved against `server.base_url`) or an
    /// absolute URL.
    pub image: String,
    /// Button label, shown under the thumbnail.
    pub label: String,
    /// Text the tap sends into the chat.
    pub text: String,
}

/// The github buttons template.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubCard {
    pub url: String,
    pub thumbnail: String,
    pub title: String,
    pub text: String,
    pub label: String,
}

impl Default for GithubCard {
    fn default() -> Self {
        Self {
            url: "https://github.com/ericlin03".into(),
            thumbnail: "/static/buttons/9919.jpg".into(),
            title: "My github site".into(),
            text: "ericlin03".into(),
            label: "Go to Eric's github".into(),
        }
    }
}

/// Canned content behind the text commands. The defaults carry the
/// shipped owner data; any field can be overridden from the config
/// file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Reply to `profile`.
    pub bio: String,
    /// Reply to `skills`.
    pub skills: String,
    /// Reply to `interests`.
    pub interests: String,
    /// Reply to any unrecognized text.
    pub help: String,
    /// Reply to `github`.
    pub github: GithubCard,
    /// Carousel behind `experience`.
    pub experience: Vec<ProfileCard>,
    /// Carousel behind `life photo`.
    pub life_photos: Vec<ProfileCard>,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            bio: "Hi, I am Eric Lin. I am majoring Information Management in National Yang \
                  Ming Chiao Tung University. My research is more like distributed system.\n\
                  The latest project I joined is a chatbot. This competition was held by TSMC \
                  and Microsoft. We used Azure Services to build a food chatbot in two days."
                .into(),
            skills: "🛠My skills:\n\
                     ● Programming Languages: Python; JavaScript; Java; PHP; SQL\n\
                     ● Programming Framework: Laravel; Django\n\
                     ● Languages: TOEIC 855 (Reading 395 / Listening 460); Mandarin Chinese\n"
                .into(),
            interests: "🎭My interests:\n\
                        ● Basketball🏀\n\
                        ● Travelling✈\n\
                        ● Movies🎥\n\
                        ● Workout🔩"
                .into(),
            help: "Hi, this bot is Eric introduction chatbot. You can input below texts or \
                   click rich menu to know more about me.\n\
                   📜profile: my introduction\n\
                   💻github: my github site\n\
                   💼experience: my work experience\n\
                   🛠skills: what I can do\n\
                   🎭interests: what I like to do\n\
                   🖼life photo: how I enjoy life"
                .into(),
            github: GithubCard::default(),
            experience: vec![
                ProfileCard {
                    image: "/static/buttons/CTBC.jpg".into(),
                    label: "CTBC intern".into(),
                    text: "App Security Intern\n\
                           ● Responsible for the black- and white-box testing of over 20 systems\n\
                           ● Built environment of white-box testing, imported policy package\n\
                           ● Updated policy package of black-box testing, recorded scripts of \
                           black-box testing\n\
                           ● Pre-reviewed vulnerability of systems before online"
                        .into(),
                },
                ProfileCard {
                    image: "/static/buttons/microsoft.jpg".into(),
                    label: "Careerhack".into(),
                    text: "2021 Microsoft & TSMC Careerhack\n\
                           ● Be shortlisted for the final contest and built a online chatbot \
                           with Azure\n\
                           ● Responsible for version control, Database, and application \
                           deployment"
                        .into(),
                },
                ProfileCard {
                    image: "/static/buttons/FJU.jpg".into(),
                    label: "FJU project".into(),
                    text: "Blockchain Ticketing Platform and Payment Project\n\
                           ● Built private blockchain with Ethereum\n\
                           ● Wrote smart contract and deployed on blockchain with Solidity\n\
                           ● Wrote API for website and blockchain with JavaScript"
                        .into(),
                },
            ],
            life_photos: vec![
                ProfileCard {
                    image: "/static/buttons/S__16416865.jpg".into(),
                    label: "Yilan Trip".into(),
                    text: "https://drive.google.com/file/d/1pQ2fzrNpve1loGtkYkxyrRUR6vT4LeMB/view?usp=sharing"
                        .into(),
                },
                ProfileCard {
                    image: "/static/buttons/S__16416866.jpg".into(),
                    label: "Tainan Trip".into(),
                    text: "This picture was taken in Tainan Museum!!!".into(),
                },
                ProfileCard {
                    image: "/static/buttons/S__16416863.jpg".into(),
                    label: "careerhack".into(),
                    text: "Hack day in Microsoft Office".into(),
                },
            ],
        }
    }
}

// ── Serde helper for Secret<String> ─────────────────────────────────────────

fn serialize_secret<S: serde::Serializer>(
    secret: &Secret<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let cfg = MeishiConfig::default();
        assert_eq!(cfg.server.bind, "127.0.0.1");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.line.api_base, "https://api.line.me");
        assert_eq!(cfg.line.blob_base, "https://api-data.line.me");
        assert_eq!(cfg.media.download_dir, "downloaded");
        assert_eq!(cfg.media.transform_timeout_secs, 20);
    }

    #[test]
    fn default_profile_carries_shipped_content() {
        let profile = ProfileConfig::default();
        assert!(profile.bio.starts_with("Hi, I am Eric Lin."));
        assert!(profile.skills.contains("● Programming Languages"));
        assert!(profile.help.contains("life photo: how I enjoy life"));
        assert_eq!(profile.github.url, "https://github.com/ericlin03");
        assert_eq!(profile.experience.len(), 3);
        assert_eq!(profile.life_photos.len(), 3);
        assert_eq!(profile.life_photos[0].label, "Yilan Trip");
    }

    #[test]
    fn deserialize_partial_toml_fills_defaults() {
        let toml_str = r#"
            [server]
            port = 9090

            [line]
            channel_secret = "shh"
            channel_token  = "tok"
        "#;
        let cfg: MeishiConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.server.bind, "127.0.0.1");
        assert_eq!(cfg.line.channel_secret.expose_secret(), "shh");
        assert_eq!(cfg.line.channel_token.expose_secret(), "tok");
        assert_eq!(cfg.line.api_base, "https://api.line.me");
        assert!(cfg.profile.bio.starts_with("Hi, I am Eric Lin."));
    }

    #[test]
    fn debug_redacts_secrets() {
        let cfg: MeishiConfig = toml::from_str(
            r#"
            [line]
            channel_secret = "super-secret"
            channel_token  = "super-token"
        "#,
        )
        .unwrap();
        let rendered = format!("{:?}", cfg.line);
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("super-secret"));
        assert!(!rendered.contains("super-token"));
    }

    #[test]
    fn serialize_roundtrip_keeps_secrets() {
        let mut cfg = MeishiConfig::default();
        cfg.line.channel_token = Secret::new("tok".into());
        let json = serde_json::to_string(&cfg).unwrap();
        let cfg2: MeishiConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg2.line.channel_token.expose_secret(), "tok");
        assert_eq!(cfg2.profile.experience.len(), 3);
    }

    #[test]
    fn profile_cards_can_be_overridden() {
        let cfg: MeishiConfig = toml::from_str(
            r#"
            [[profile.experience]]
            image = "/static/buttons/acme.jpg"
            label = "ACME"
            text  = "Shipped widgets"
        "#,
        )
        .unwrap();
        assert_eq!(cfg.profile.experience.len(), 1);
        assert_eq!(cfg.profile.experience[0].label, "ACME");
        // Untouched sections keep their defaults.
        assert_eq!(cfg.profile.life_photos.len(), 3);
    }
}
