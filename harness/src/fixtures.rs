//! Generators for request payloads. Every generator draws from its own seeded stream so
//! that runs are repeatable with `TEST_SEED`, while parallel scenarios still get distinct data.
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use gateway::models::auth::{LoginRequest, RegisterRequest, UpdatePasswordRequest};
use gateway::models::core::Id;
use gateway::models::notification::SendNotificationRequest;
use gateway::models::post::{CreatePostRequest, MediaItemInput, UpdatePostRequest};
use gateway::models::user::{CreateUserRequest, UpdateAvatarRequest, UpdateUserRequest};
use lazy_static::lazy_static;
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};

pub const DEFAULT_PASSWORD_LENGTH: usize = 10;
pub const UPDATED_PASSWORD_LENGTH: usize = 12;

pub const AVATAR_SIZE: u32 = 300;
pub const POST_IMAGE_WIDTH: u32 = 800;
pub const POST_IMAGE_HEIGHT: u32 = 600;

pub const MAX_MEDIA_ITEMS: usize = 5;
pub const MAX_TAG_ITEMS: usize = 4;
pub const MIN_TAG_ITEMS: usize = 1;
pub const MAX_MEDIA_POSITION: i32 = 9;

pub const BIO_WORDS: usize = 10;
pub const TITLE_WORDS: usize = 5;

pub const MEDIA_TYPE_IMAGE: &str = "image";
pub const MEDIA_TYPE_VIDEO: &str = "video";
pub const MEDIA_TYPES: [&str; 2] = [MEDIA_TYPE_IMAGE, MEDIA_TYPE_VIDEO];

pub const NOTIFICATION_TYPE_FOLLOW: &str = "follow";
pub const NOTIFICATION_TYPE_LIKE: &str = "like";
pub const NOTIFICATION_TYPE_COMMENT: &str = "comment";
pub const NOTIFICATION_TYPE_MENTION: &str = "mention";
pub const NOTIFICATION_TYPE_SYSTEM: &str = "system";
pub const NOTIFICATION_TYPES: [&str; 5] = [
    NOTIFICATION_TYPE_FOLLOW,
    NOTIFICATION_TYPE_LIKE,
    NOTIFICATION_TYPE_COMMENT,
    NOTIFICATION_TYPE_MENTION,
    NOTIFICATION_TYPE_SYSTEM,
];
pub const PAYLOAD_DATA_KEY: &str = "data";

pub use gateway::models::notification::FOLLOW_CREATED;

const ADJECTIVES: &[&str] = &[
    "amber", "brave", "calm", "dusty", "eager", "fuzzy", "gentle", "hollow", "icy", "jolly",
    "keen", "lucky", "mellow", "nimble", "odd", "proud", "quiet", "rusty", "sunny", "tidy",
];
const NOUNS: &[&str] = &[
    "badger", "comet", "delta", "falcon", "garden", "harbor", "island", "jaguar", "kettle",
    "lantern", "meadow", "nebula", "otter", "pepper", "quartz", "river", "summit", "tulip",
    "violin", "willow",
];
const FIRST_NAMES: &[&str] = &[
    "Ada", "Bao", "Chidi", "Dana", "Eli", "Fatima", "Gus", "Hana", "Ivo", "Jun", "Kai", "Lena",
    "Mateo", "Noor", "Oskar", "Priya", "Quinn", "Rosa", "Sami", "Tove",
];
const LAST_NAMES: &[&str] = &[
    "Andersen", "Botha", "Costa", "Dubois", "Eze", "Fischer", "Garcia", "Haddad", "Ito", "Jensen",
    "Kowalski", "Lund", "Moreau", "Nakamura", "Okafor", "Petrov", "Quispe", "Rossi", "Silva",
    "Tanaka",
];
const WORDS: &[&str] = &[
    "artisan", "bicycle", "coffee", "denim", "echo", "flannel", "gluten", "hashtag", "indie",
    "jianbing", "kombucha", "letterpress", "mixtape", "normcore", "organic", "polaroid",
    "quinoa", "ramps", "sriracha", "typewriter", "umami", "vinyl", "wayfarers", "yoga", "zine",
];

const LOWER: &[u8] = b"abcdefghijkmnopqrstuvwxyz";
const UPPER: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ";
const DIGITS: &[u8] = b"23456789";
const SPECIAL: &[u8] = b"!@#$%&*?";

static STREAM: AtomicU64 = AtomicU64::new(0);

lazy_static! {
    static ref CLOCK_SEED: u64 = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();
}

pub struct Fixtures {
    rng: StdRng,
    seed: u64,
}

impl Fixtures {
    /// A generator on the next stream derived from `base_seed`, or from the clock when `None`
    #[must_use]
    pub fn new(base_seed: Option<u64>) -> Self {
        let base = base_seed.unwrap_or(*CLOCK_SEED);
        let stream = STREAM.fetch_add(1, Ordering::Relaxed);
        Self::with_seed(base.wrapping_add(stream.wrapping_mul(0x9E37_79B9_7F4A_7C15)))
    }

    /// A generator with exactly this seed
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        debug!("Fixtures seeded with {seed}");
        Fixtures {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items.choose(&mut self.rng).copied().unwrap_or_default()
    }

    pub fn username(&mut self) -> String {
        let adjective = self.pick(ADJECTIVES);
        let noun = self.pick(NOUNS);
        let suffix: u32 = self.rng.gen_range(100_000..1_000_000);
        format!("{adjective}_{noun}{suffix}")
    }

    pub fn email(&mut self) -> String {
        format!("{}@example.com", self.username())
    }

    pub fn full_name(&mut self) -> String {
        format!("{} {}", self.pick(FIRST_NAMES), self.pick(LAST_NAMES))
    }

    /// A password of `length` characters with at least one lower case letter, upper case
    /// letter, digit and special character each
    pub fn password(&mut self, length: usize) -> String {
        let classes = [LOWER, UPPER, DIGITS, SPECIAL];
        let mut chars: Vec<u8> = classes
            .iter()
            .map(|class| class[self.rng.gen_range(0..class.len())])
            .collect();
        let all: Vec<u8> = classes.concat();
        while chars.len() < length {
            chars.push(all[self.rng.gen_range(0..all.len())]);
        }
        chars.shuffle(&mut self.rng);
        chars.into_iter().map(char::from).collect()
    }

    pub fn word(&mut self) -> String {
        self.pick(WORDS).to_string()
    }

    /// `words` random words, capitalised and terminated with a full stop
    pub fn sentence(&mut self, words: usize) -> String {
        let mut sentence = (0..words.max(1))
            .map(|_| self.pick(WORDS))
            .collect::<Vec<_>>()
            .join(" ");
        if let Some(first) = sentence.get(0..1) {
            let upper = first.to_uppercase();
            sentence.replace_range(0..1, &upper);
        }
        sentence.push('.');
        sentence
    }

    pub fn paragraph(&mut self) -> String {
        let sentences = self.rng.gen_range(3..=5);
        (0..sentences)
            .map(|_| {
                let words = self.rng.gen_range(4..=10);
                self.sentence(words)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn image_url(&mut self, width: u32, height: u32) -> String {
        let id: u32 = self.rng.gen_range(1..1000);
        format!("https://picsum.photos/id/{id}/{width}/{height}")
    }

    pub fn register_request(&mut self) -> RegisterRequest {
        RegisterRequest {
            username: self.username(),
            email: self.email(),
            password: self.password(DEFAULT_PASSWORD_LENGTH),
            full_name: self.full_name(),
            bio: self.sentence(BIO_WORDS),
            avatar_url: self.image_url(AVATAR_SIZE, AVATAR_SIZE),
        }
    }

    /// Login for the given account; a random one when `login` or `password` is empty
    pub fn login_request(&mut self, login: &str, password: &str) -> LoginRequest {
        LoginRequest {
            login: if login.is_empty() {
                self.username()
            } else {
                login.to_string()
            },
            password: if password.is_empty() {
                self.password(DEFAULT_PASSWORD_LENGTH)
            } else {
                password.to_string()
            },
        }
    }

    pub fn update_password_request(&mut self, old_password: &str) -> UpdatePasswordRequest {
        UpdatePasswordRequest {
            old_password: old_password.to_string(),
            new_password: self.password(UPDATED_PASSWORD_LENGTH),
        }
    }

    pub fn create_user_request(&mut self) -> CreateUserRequest {
        let register = self.register_request();
        CreateUserRequest {
            username: register.username,
            email: register.email,
            password: register.password,
            full_name: register.full_name,
            bio: register.bio,
            avatar_url: register.avatar_url,
        }
    }

    pub fn update_user_request(&mut self, id: Id) -> UpdateUserRequest {
        UpdateUserRequest {
            id,
            username: self.username(),
            email: self.email(),
            full_name: self.full_name(),
            bio: self.sentence(BIO_WORDS),
        }
    }

    pub fn update_avatar_request(&mut self) -> UpdateAvatarRequest {
        UpdateAvatarRequest {
            avatar_url: self.image_url(AVATAR_SIZE, AVATAR_SIZE),
        }
    }

    pub fn media_item(&mut self) -> MediaItemInput {
        MediaItemInput {
            media_type: self.pick(&MEDIA_TYPES).to_string(),
            url: self.image_url(POST_IMAGE_WIDTH, POST_IMAGE_HEIGHT),
            position: self.rng.gen_range(0..MAX_MEDIA_POSITION),
        }
    }

    fn media_items(&mut self) -> Vec<MediaItemInput> {
        let count = self.rng.gen_range(0..MAX_MEDIA_ITEMS);
        (0..count).map(|_| self.media_item()).collect()
    }

    fn tags(&mut self) -> Vec<String> {
        let count = self.rng.gen_range(MIN_TAG_ITEMS..MIN_TAG_ITEMS + MAX_TAG_ITEMS);
        (0..count).map(|_| self.word()).collect()
    }

    pub fn create_post_request(&mut self) -> CreatePostRequest {
        CreatePostRequest {
            title: self.sentence(TITLE_WORDS),
            content: self.paragraph(),
            media_items: self.media_items(),
            tags: self.tags(),
        }
    }

    pub fn update_post_request(&mut self) -> UpdatePostRequest {
        UpdatePostRequest {
            title: self.sentence(TITLE_WORDS),
            content: self.paragraph(),
            media_items: self.media_items(),
            tags: self.tags(),
        }
    }

    pub fn notification_type(&mut self) -> String {
        self.pick(&NOTIFICATION_TYPES).to_string()
    }

    /// `{"data": <sentence>}`
    pub fn notification_payload(&mut self) -> Value {
        json!({ PAYLOAD_DATA_KEY: self.sentence(TITLE_WORDS) })
    }

    pub fn send_notification_request(&mut self, recipient: Id) -> SendNotificationRequest {
        SendNotificationRequest {
            user_id: recipient,
            notification_type: self.notification_type(),
            payload: self.notification_payload(),
        }
    }
}
