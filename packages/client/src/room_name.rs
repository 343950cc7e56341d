//! Room names and join URLs.

use rand::Rng;
use url::Url;

const ROOM_NAME_WORDS: usize = 4;

const WORDS: &[&str] = &[
    "amber", "apple", "arrow", "basin", "berry", "birch", "blaze", "brook", "cedar", "chalk",
    "cloud", "comet", "coral", "crane", "delta", "dune", "ember", "fern", "field", "flint",
    "frost", "grove", "harbor", "hazel", "heron", "island", "ivory", "jade", "lake", "lemon",
    "lily", "maple", "marsh", "meadow", "mint", "moss", "night", "oak", "ocean", "olive",
    "orbit", "otter", "pearl", "pebble", "pine", "plum", "pond", "quartz", "rain", "raven",
    "reed", "ridge", "river", "robin", "sage", "shore", "slate", "snow", "spark", "spruce",
    "stone", "storm", "tide", "willow",
];

/// Generate a random room name of four dash-joined words, e.g. `otter-maple-tide-flint`.
pub fn generate_room_name() -> String {
    let mut rng = rand::rng();
    (0..ROOM_NAME_WORDS)
        .map(|_| WORDS[rng.random_range(0..WORDS.len())])
        .collect::<Vec<_>>()
        .join("-")
}

/// Append the room to the server's WebSocket base URL and set the username query.
pub fn build_join_url(
    base_url: &str,
    room_id: &str,
    username: &str,
) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(base_url)?;
    let base_path = url.path().trim_end_matches('/');
    let path = format!("{}/{}", base_path, room_id);
    url.set_path(&path);
    url.set_query(None);
    url.query_pairs_mut().append_pair("username", username);
    Ok(url)
}
