//! Built-in mock records loaded by `MockDb::seeded`.

use crate::models::{
    Character, CharacterImage, CharacterKink, CharacterMood, CharacterStatus, ChatRoom,
    KinkRating, User,
};

/// Password accepted for every seeded user.
pub const MOCK_PASSWORD: &str = "password";

fn user(
    id: &str,
    username: &str,
    email: &str,
    avatar: Option<&str>,
    created_at: &str,
    updated_at: &str,
    is_admin: bool,
    timezone: &str,
    last_login: &str,
) -> User {
    User {
        id: id.to_string(),
        username: username.to_string(),
        email: email.to_string(),
        avatar: avatar.map(str::to_string),
        created_at: created_at.to_string(),
        updated_at: updated_at.to_string(),
        is_verified: true,
        is_admin,
        timezone: timezone.to_string(),
        last_login: Some(last_login.to_string()),
    }
}

pub fn users() -> Vec<User> {
    vec![
        user(
            "user_1",
            "admin",
            "admin@roleplayhub.com",
            None,
            "2023-01-01T00:00:00Z",
            "2023-01-01T00:00:00Z",
            true,
            "UTC",
            "2024-04-01T15:30:00Z",
        ),
        user(
            "user_2",
            "player123",
            "player123@example.com",
            None,
            "2023-02-15T18:30:00Z",
            "2023-02-15T18:30:00Z",
            false,
            "America/New_York",
            "2024-04-09T22:45:00Z",
        ),
        user(
            "user_3",
            "fantasy_lover",
            "fantasy@example.com",
            Some("https://ext.same-assets.com/2421641290/avatar1.jpg"),
            "2023-05-22T09:15:00Z",
            "2023-08-10T14:20:00Z",
            false,
            "Europe/London",
            "2024-04-08T13:15:00Z",
        ),
        user(
            "user_4",
            "dragon_tamer",
            "dragons@example.com",
            Some("https://ext.same-assets.com/2421641290/avatar2.jpg"),
            "2023-07-18T11:45:00Z",
            "2024-01-05T16:30:00Z",
            false,
            "Asia/Tokyo",
            "2024-04-10T02:30:00Z",
        ),
        user(
            "user_5",
            "elvish_bard",
            "bard@example.com",
            Some("https://ext.same-assets.com/2421641290/avatar3.jpg"),
            "2023-09-30T20:00:00Z",
            "2023-11-12T08:45:00Z",
            false,
            "Europe/Paris",
            "2024-04-05T19:20:00Z",
        ),
    ]
}

struct CharacterSeed {
    id: &'static str,
    user_id: &'static str,
    name: &'static str,
    age: Option<&'static str>,
    gender: &'static str,
    species: &'static str,
    personality: &'static str,
    public: bool,
    views: u64,
    created_at: &'static str,
    updated_at: &'static str,
    status: CharacterStatus,
    mood: Option<CharacterMood>,
}

impl CharacterSeed {
    fn build(self) -> Character {
        Character {
            id: self.id.to_string(),
            user_id: self.user_id.to_string(),
            name: self.name.to_string(),
            age: self.age.map(str::to_string),
            gender: self.gender.to_string(),
            species: self.species.to_string(),
            height: None,
            body_type: None,
            personality: self.personality.to_string(),
            background: None,
            appearance: None,
            public: self.public,
            views: self.views,
            created_at: self.created_at.to_string(),
            updated_at: self.updated_at.to_string(),
            current_status: self.status,
            current_mood: self.mood,
            custom_status: None,
            allow_random_rp: true,
            private_details: None,
            content_preferences: serde_json::Map::new(),
        }
    }
}

pub fn characters() -> Vec<Character> {
    [
        CharacterSeed {
            id: "char_1",
            user_id: "user_1",
            name: "Lyra Moonwhisper",
            age: Some("127"),
            gender: "female",
            species: "Elf",
            personality: "Wise and patient, with a mischievous streak under moonlight.",
            public: true,
            views: 245,
            created_at: "2023-03-10T12:00:00Z",
            updated_at: "2024-03-28T09:30:00Z",
            status: CharacterStatus::Available,
            mood: Some(CharacterMood::Playful),
        },
        CharacterSeed {
            id: "char_2",
            user_id: "user_1",
            name: "Kael Ironforge",
            age: Some("58"),
            gender: "male",
            species: "Dwarf",
            personality: "Gruff blacksmith who secretly writes poetry.",
            public: true,
            views: 112,
            created_at: "2023-04-02T08:15:00Z",
            updated_at: "2024-02-14T18:00:00Z",
            status: CharacterStatus::Busy,
            mood: None,
        },
        CharacterSeed {
            id: "char_3",
            user_id: "user_2",
            name: "Vex",
            age: Some("25"),
            gender: "other",
            species: "Tiefling",
            personality: "Sharp-tongued rogue with a soft spot for strays.",
            public: true,
            views: 389,
            created_at: "2023-06-21T20:45:00Z",
            updated_at: "2024-04-02T11:10:00Z",
            status: CharacterStatus::Looking,
            mood: Some(CharacterMood::Confident),
        },
        CharacterSeed {
            id: "char_4",
            user_id: "user_3",
            name: "Seraphina Dawnlight",
            age: Some("about 300"),
            gender: "female",
            species: "Angel",
            personality: "Gentle guardian struggling with earthly temptations.",
            public: true,
            views: 501,
            created_at: "2023-08-11T14:30:00Z",
            updated_at: "2024-01-19T07:50:00Z",
            status: CharacterStatus::Away,
            mood: Some(CharacterMood::Shy),
        },
        CharacterSeed {
            id: "char_5",
            user_id: "user_4",
            name: "Ignis",
            age: None,
            gender: "male",
            species: "Dragon",
            personality: "Ancient, proud and possessive of everything that glitters.",
            public: true,
            views: 77,
            created_at: "2023-10-05T03:00:00Z",
            updated_at: "2024-04-09T22:00:00Z",
            status: CharacterStatus::Available,
            mood: Some(CharacterMood::Dominant),
        },
        CharacterSeed {
            id: "char_6",
            user_id: "user_5",
            name: "Thalion",
            age: Some("212"),
            gender: "male",
            species: "Elf",
            personality: "Wandering bard collecting stories in every tavern.",
            public: false,
            views: 15,
            created_at: "2023-12-01T16:20:00Z",
            updated_at: "2024-03-03T10:05:00Z",
            status: CharacterStatus::Private,
            mood: None,
        },
    ]
    .into_iter()
    .map(CharacterSeed::build)
    .collect()
}

fn image(id: &str, character_id: &str, url: &str, is_primary: bool, order: u32) -> CharacterImage {
    CharacterImage {
        id: id.to_string(),
        character_id: character_id.to_string(),
        url: url.to_string(),
        thumbnail_url: Some(url.to_string()),
        title: None,
        description: None,
        is_primary,
        order,
        uploaded_at: "2024-01-01T00:00:00Z".to_string(),
        file_type: Some("image/jpeg".to_string()),
        file_size: None,
    }
}

pub fn images() -> Vec<CharacterImage> {
    vec![
        image("img_1", "char_1", "https://ext.same-assets.com/2421641290/lyra1.jpg", true, 0),
        image("img_2", "char_1", "https://ext.same-assets.com/2421641290/lyra2.jpg", false, 1),
        image("img_3", "char_3", "https://ext.same-assets.com/2421641290/vex1.jpg", true, 0),
        image("img_4", "char_4", "https://ext.same-assets.com/2421641290/sera1.jpg", true, 0),
    ]
}

pub fn kinks() -> Vec<CharacterKink> {
    let kink = |id: &str, character_id: &str, kink_id: &str, rating| CharacterKink {
        id: id.to_string(),
        character_id: character_id.to_string(),
        kink_id: kink_id.to_string(),
        rating,
    };
    vec![
        kink("kink_1", "char_1", "romance", KinkRating::Fave),
        kink("kink_2", "char_1", "adventure", KinkRating::Yes),
        kink("kink_3", "char_3", "romance", KinkRating::Maybe),
        kink("kink_4", "char_4", "romance", KinkRating::Fave),
        kink("kink_5", "char_5", "adventure", KinkRating::Fave),
    ]
}

pub fn rooms() -> Vec<ChatRoom> {
    let room = |id: &str, name: &str, description: &str| ChatRoom {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
    };
    vec![
        room("room_1", "The Rusty Tankard", "A busy tavern at the crossroads."),
        room("room_2", "Moonlit Grove", "A quiet clearing under the stars."),
        room("room_3", "Dragon's Peak", "The summit where few dare to climb."),
    ]
}
