//! Mock backend data.
//!
//! Everything here is built once when the dev server starts and is read-only
//! afterwards. Payload shapes follow the streaming backend's public and admin
//! API closely enough for the web client to run standalone.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde_json::{json, Value};

const VERSION: &str = concat!("beacon-dev ", env!("CARGO_PKG_VERSION"));

/// Public server configuration, as served by `/api/config`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MockConfig {
    pub name: String,
    pub summary: String,
    pub logo: String,
    pub tags: Vec<String>,
    pub version: String,
    pub nsfw: bool,
    pub extra_page_content: String,
    pub stream_title: String,
    pub social_handles: Vec<SocialHandle>,
    pub chat_disabled: bool,
    pub external_actions: Vec<Value>,
    pub custom_styles: String,
    pub max_socket_payload_size: u32,
    pub federation: Federation,
    pub notifications: Notifications,
    pub authentication: Authentication,
}

#[derive(Debug, Clone, Serialize)]
pub struct SocialHandle {
    pub platform: String,
    pub url: String,
    pub icon: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Federation {
    pub enabled: bool,
    pub account: String,
    pub follower_count: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Notifications {
    pub browser: BrowserNotifications,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserNotifications {
    pub enabled: bool,
    pub public_key: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Authentication {
    pub indie_auth_enabled: bool,
}

/// Live status snapshot, as served by `/api/status`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MockStatus {
    pub online: bool,
    pub viewer_count: u32,
    pub last_connect_time: Option<DateTime<Utc>>,
    pub last_disconnect_time: Option<DateTime<Utc>>,
    pub version_number: String,
    pub stream_title: String,
    pub server_time: DateTime<Utc>,
}

/// Process-wide mock data. Construct once, share behind an `Arc`.
#[derive(Debug)]
pub struct MockData {
    config: MockConfig,
    status: MockStatus,
    config_value: Value,
    status_value: Value,
    config_script_json: String,
    status_script_json: String,
    started_at: DateTime<Utc>,
}

impl MockData {
    /// Mock data for a server called `name`, with timestamps fixed at `now`.
    pub fn new(name: &str, now: DateTime<Utc>) -> serde_json::Result<Self> {
        let config = MockConfig {
            name: name.to_string(),
            summary: "A local development stream. Nothing here is real.".to_string(),
            logo: "/logo".to_string(),
            tags: vec!["development".to_string(), "local".to_string()],
            version: VERSION.to_string(),
            nsfw: false,
            extra_page_content: "<p>Served by <code>beacon dev</code>.</p>".to_string(),
            stream_title: "Testing the player".to_string(),
            social_handles: vec![SocialHandle {
                platform: "github".to_string(),
                url: "https://github.com/".to_string(),
                icon: "/img/platformlogos/github.svg".to_string(),
            }],
            chat_disabled: false,
            external_actions: Vec::new(),
            custom_styles: String::new(),
            max_socket_payload_size: 2048,
            federation: Federation {
                enabled: false,
                account: format!("@{}@localhost", slug(name)),
                follower_count: 3,
            },
            notifications: Notifications {
                browser: BrowserNotifications {
                    enabled: false,
                    public_key: String::new(),
                },
            },
            authentication: Authentication {
                indie_auth_enabled: false,
            },
        };

        let status = MockStatus {
            online: true,
            viewer_count: 42,
            last_connect_time: Some(now - Duration::minutes(90)),
            last_disconnect_time: None,
            version_number: VERSION.to_string(),
            stream_title: config.stream_title.clone(),
            server_time: now,
        };

        Ok(Self {
            config_value: serde_json::to_value(&config)?,
            status_value: serde_json::to_value(&status)?,
            config_script_json: script_safe_json(&serde_json::to_string(&config)?),
            status_script_json: script_safe_json(&serde_json::to_string(&status)?),
            config,
            status,
            started_at: now,
        })
    }

    pub fn config(&self) -> &MockConfig {
        &self.config
    }

    pub fn status(&self) -> &MockStatus {
        &self.status
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Config JSON safe to embed inside an inline `<script>`.
    pub fn config_script_json(&self) -> &str {
        &self.config_script_json
    }

    /// Status JSON safe to embed inside an inline `<script>`.
    pub fn status_script_json(&self) -> &str {
        &self.status_script_json
    }

    pub fn status_payload(&self) -> Value {
        self.status_value.clone()
    }

    pub fn config_payload(&self) -> Value {
        self.config_value.clone()
    }

    pub fn emoji(&self) -> Value {
        json!([
            { "name": "beacon", "url": "/img/emoji/beacon.gif" },
            { "name": "wave", "url": "/img/emoji/wave.png" },
            { "name": "party", "url": "/img/emoji/party.png" },
        ])
    }

    pub fn video_variants(&self) -> Value {
        json!([
            { "index": 0, "name": "1080p", "videoBitrate": 6000, "framerate": 30 },
            { "index": 1, "name": "720p", "videoBitrate": 3000, "framerate": 30 },
            { "index": 2, "name": "Passthrough", "videoBitrate": 0, "framerate": 0 },
        ])
    }

    /// Fabricated chat registration. Fresh ids on every call.
    pub fn register_chat_user(&self) -> Value {
        let id = uuid::Uuid::new_v4().simple().to_string();
        json!({
            "id": id,
            "accessToken": uuid::Uuid::new_v4().simple().to_string(),
            "displayName": format!("viewer-{}", &id[..6]),
            "displayColor": 3,
            "createdAt": self.started_at,
        })
    }

    pub fn chat_history(&self) -> Value {
        json!([self.system_message()])
    }

    pub fn server_config(&self) -> Value {
        json!({
            "instanceDetails": {
                "name": self.config.name,
                "summary": self.config.summary,
                "logo": self.config.logo,
                "tags": self.config.tags,
                "nsfw": self.config.nsfw,
                "extraPageContent": self.config.extra_page_content,
                "streamTitle": self.config.stream_title,
                "socialHandles": self.config.social_handles,
                "customStyles": self.config.custom_styles,
            },
            "streamKeys": [{ "key": "dev-stream-key", "comment": "Local development" }],
            "rtmpServerPort": 1935,
            "webServerPort": 8080,
            "chatDisabled": self.config.chat_disabled,
            "videoSettings": {
                "latencyLevel": 2,
                "videoQualityVariants": self.video_variants(),
            },
            "federation": self.config.federation,
            "notifications": self.config.notifications,
            "version": self.config.version,
        })
    }

    /// Status plus broadcaster details.
    pub fn admin_status(&self) -> Value {
        json!({
            "broadcaster": {
                "remoteAddr": "127.0.0.1",
                "time": self.status.last_connect_time,
                "streamDetails": {
                    "width": 1920,
                    "height": 1080,
                    "framerate": 30,
                    "videoBitrate": 6000,
                    "videoCodec": "H.264",
                    "audioBitrate": 160,
                    "audioCodec": "AAC",
                    "encoder": "ffmpeg",
                },
            },
            "online": self.status.online,
            "viewerCount": self.status.viewer_count,
            "overallPeakViewerCount": 120,
            "sessionPeakViewerCount": 57,
            "streamTitle": self.status.stream_title,
            "versionNumber": self.status.version_number,
        })
    }

    pub fn hardware_stats(&self) -> Value {
        let samples = |values: [u32; 3]| {
            values
                .iter()
                .enumerate()
                .map(|(i, value)| {
                    json!({
                        "time": self.started_at - Duration::minutes(2 - i as i64),
                        "value": value,
                    })
                })
                .collect::<Vec<_>>()
        };
        json!({
            "cpu": samples([12, 18, 15]),
            "memory": samples([41, 42, 42]),
            "disk": samples([63, 63, 63]),
        })
    }

    pub fn logs(&self) -> Value {
        json!([
            {
                "level": "info",
                "message": "RTMP server is listening for incoming stream on port 1935",
                "time": self.started_at - Duration::minutes(95),
            },
            {
                "level": "info",
                "message": "Inbound stream connected from 127.0.0.1",
                "time": self.started_at - Duration::minutes(90),
            },
            {
                "level": "warning",
                "message": "Your encoder is sending a keyframe interval longer than recommended",
                "time": self.started_at - Duration::minutes(89),
            },
        ])
    }

    pub fn viewers(&self) -> Value {
        json!([
            {
                "firstSeen": self.started_at - Duration::minutes(30),
                "lastSeen": self.started_at,
                "userAgent": "Mozilla/5.0 (X11; Linux x86_64) Firefox/128.0",
                "ipAddress": "127.0.0.1",
                "clientID": "dev-viewer-1",
                "geo": { "countryCode": "ZZ", "regionName": "Local", "timeZone": "UTC" },
            },
        ])
    }

    pub fn chat_messages(&self) -> Value {
        json!([
            self.system_message(),
            {
                "id": "msg-dev-2",
                "type": "CHAT",
                "timestamp": self.started_at - Duration::minutes(5),
                "user": {
                    "id": "user-dev-1",
                    "displayName": "viewer-1",
                    "displayColor": 7,
                    "createdAt": self.started_at - Duration::days(3),
                    "previousNames": ["viewer-1"],
                },
                "body": "Hello from the mock chat!",
                "visible": true,
            },
        ])
    }

    pub fn webhooks(&self) -> Value {
        json!([
            {
                "id": 1,
                "url": "http://127.0.0.1:9000/hook",
                "events": ["STREAM_STARTED", "STREAM_STOPPED"],
                "timestamp": self.started_at - Duration::days(1),
                "lastUsed": null,
            },
        ])
    }

    pub fn access_tokens(&self) -> Value {
        json!([
            {
                "id": 1,
                "displayName": "dev-bot",
                "accessToken": "dev-access-token",
                "scopes": ["CAN_SEND_SYSTEM_MESSAGES"],
                "createdAt": self.started_at - Duration::days(2),
                "lastUsed": null,
            },
        ])
    }

    pub fn followers(&self) -> Value {
        json!({
            "results": [
                {
                    "link": "https://social.example/@alice",
                    "name": "Alice",
                    "username": "alice@social.example",
                    "image": "",
                    "timestamp": self.started_at - Duration::days(4),
                    "disabledAt": null,
                },
            ],
            "total": 1,
        })
    }

    fn system_message(&self) -> Value {
        json!({
            "id": "msg-dev-1",
            "type": "SYSTEM",
            "timestamp": self.started_at - Duration::minutes(90),
            "body": format!("Welcome to {}! This chat is a local mock.", self.config.name),
            "visible": true,
        })
    }
}

/// Acknowledgement for write endpoints. Nothing is persisted.
pub fn ack(_data: &MockData) -> Value {
    json!({ "success": true, "message": "changes accepted (not persisted)" })
}

/// Escape `</` so the JSON cannot close the surrounding `<script>` element.
pub fn script_safe_json(json: &str) -> String {
    json.replace("</", "<\\/")
}

fn slug(name: &str) -> String {
    let slug: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "stream".to_string()
    } else {
        slug.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> MockData {
        MockData::new("Dev Stream", Utc::now()).unwrap()
    }

    #[test]
    fn test_status_shape() {
        let status = data().status_payload();
        assert_eq!(status["online"], true);
        assert!(status["viewerCount"].is_u64());
        assert!(status["serverTime"].is_string());
        assert!(status["lastDisconnectTime"].is_null());
        assert!(status.get("versionNumber").is_some());
    }

    #[test]
    fn test_config_shape() {
        let config = data().config_payload();
        assert_eq!(config["name"], "Dev Stream");
        assert!(config["socialHandles"].is_array());
        assert!(config["federation"]["enabled"].is_boolean());
        assert_eq!(config["federation"]["account"], "@dev-stream@localhost");
        assert!(config["notifications"]["browser"].is_object());
    }

    #[test]
    fn test_script_json_is_stable_and_escaped() {
        let data = data();
        assert_eq!(data.status_script_json(), data.status_script_json());
        assert!(data.config_script_json().contains("<\\/p>"));
        assert!(!data.config_script_json().contains("</"));
    }

    #[test]
    fn test_chat_registration_is_fresh() {
        let data = data();
        let a = data.register_chat_user();
        let b = data.register_chat_user();
        assert_ne!(a["id"], b["id"]);
        assert!(a["accessToken"].is_string());
    }

    #[test]
    fn test_chat_history_has_one_system_message() {
        let history = data().chat_history();
        let messages = history.as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["type"], "SYSTEM");
    }

    #[test]
    fn test_admin_status_has_broadcaster() {
        let status = data().admin_status();
        assert_eq!(status["broadcaster"]["streamDetails"]["videoCodec"], "H.264");
        assert_eq!(status["viewerCount"], 42);
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("Dev Stream!"), "dev-stream");
        assert_eq!(slug("***"), "stream");
    }
}
