use super::SourceAdapter;
use anyhow::Result;
use async_trait::async_trait;

/// Concrete, picturable English words and activities
pub const PICTURE_WORDS: &[&str] = &[
    "the apple", "the banana", "the orange", "the grape", "the watermelon", "the strawberry", "the lemon", "the peach", "the pear", "the pineapple",
    "the dog", "the cat", "the horse", "the cow", "the sheep", "the pig", "the chicken", "the duck", "the goose", "the rabbit",
    "the car", "the bus", "the bicycle", "the motorcycle", "the truck", "the train", "the boat", "the ship", "the airplane", "the helicopter",
    "the table", "the chair", "the bed", "the sofa", "the desk", "the lamp", "the door", "the window", "the cup", "the plate",
    "the house", "the apartment", "the school", "the hospital", "the store", "the restaurant", "the bridge", "the road", "the park", "the garden",
    "the tree", "the flower", "the grass", "the leaf", "the mountain", "the river", "the lake", "the sea", "the beach", "the island",
    "the sun", "the moon", "the star", "the cloud", "the rain", "the snow", "the wind", "the fire", "the ice", "the stone",
    "the man", "the woman", "the boy", "the girl", "the baby", "the teacher", "the doctor", "the farmer", "the police", "the chef",
    "the book", "the pen", "the pencil", "the paper", "the notebook", "the bag", "the phone", "the computer", "the clock", "the watch",
    "the shirt", "the pants", "the dress", "the skirt", "the shoes", "the hat", "the coat", "the socks", "the belt", "the gloves",
    "the bread", "the rice", "the egg", "the cheese", "the meat", "the fish", "the milk", "the butter", "the soup", "the cake",
    "the salt", "the sugar", "the pepper", "the oil", "the water", "the tea", "the coffee", "the juice", "the sandwich", "the pizza",
    "the ball", "the kite", "the doll", "the toy", "the bottle", "the box", "the bag", "the key", "the knife", "the fork",
    "the spoon", "the mirror", "the soap", "the brush", "the toothbrush", "the toothpaste", "the comb", "the towel", "the bucket", "the rope",
    "running", "walking", "jumping", "sitting", "standing", "sleeping", "eating", "drinking", "reading", "writing",
    "opening", "closing", "pushing", "pulling", "throwing", "catching", "climbing", "swimming", "driving", "riding",
    "singing", "dancing", "drawing", "painting", "cooking", "cleaning", "washing", "cutting", "building", "playing",
    "smiling", "crying", "laughing", "talking", "listening", "watching", "looking", "pointing", "waving", "carrying",
    "buying", "selling", "paying", "finding", "holding", "picking", "dropping", "helping", "sending", "calling",
    "digging", "planting", "watering", "feeding", "hunting", "fishing", "baking", "mixing", "fixing", "driving",
    "jumping", "kicking", "hitting", "throwing", "catching", "hugging", "kissing", "shaking", "turning", "stopping",
];

/// Lower-case and drop a leading "the " to get an image search term
pub fn clean_word_for_search(word: &str) -> String {
    let cleaned = word.to_lowercase();
    match cleaned.strip_prefix("the ") {
        Some(rest) => rest.to_string(),
        None => cleaned,
    }
}

/// Word list for picture vocabulary; repeated words stay in place
#[derive(Debug, Clone)]
pub struct PictureWordList {
    words: Vec<String>,
}

impl PictureWordList {
    pub fn new(words: Vec<String>) -> Self {
        Self { words }
    }

    /// Only the first `limit` words
    pub fn truncated(mut self, limit: usize) -> Self {
        self.words.truncate(limit);
        self
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for PictureWordList {
    fn default() -> Self {
        Self::new(PICTURE_WORDS.iter().map(|w| w.to_string()).collect())
    }
}

#[async_trait]
impl SourceAdapter for PictureWordList {
    type Item = String;

    fn name(&self) -> String {
        "picture words".to_string()
    }

    async fn fetch_items(&self) -> Result<Vec<String>> {
        Ok(self.words.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_word_for_search() {
        assert_eq!(clean_word_for_search("the apple"), "apple");
        assert_eq!(clean_word_for_search("The Ice"), "ice");
        assert_eq!(clean_word_for_search("running"), "running");
        assert_eq!(clean_word_for_search("theater"), "theater");
    }

    #[tokio::test]
    async fn test_default_list_keeps_duplicates() {
        let words = PictureWordList::default().fetch_items().await.unwrap();
        assert_eq!(words.len(), PICTURE_WORDS.len());
        assert_eq!(words[0], "the apple");
        assert_eq!(words.iter().filter(|w| *w == "driving").count(), 2);
    }

    #[test]
    fn test_truncated() {
        let list = PictureWordList::default().truncated(2);
        assert_eq!(list.len(), 2);
    }
}
