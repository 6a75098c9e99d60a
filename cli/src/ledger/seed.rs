use super::{Friend, FriendId};

const SEED: [(&str, &str, f64); 3] = [
    ("118836", "Clark", -7.0),
    ("933372", "Sarah", 20.0),
    ("499476", "Anthony", 0.0),
];

/// The friends a new session starts with, avatars as `<avatar_base>?u=<id>`.
pub fn initial_friends(avatar_base: &str) -> Vec<Friend> {
    SEED.iter()
        .map(|&(id, name, balance)| Friend {
            id: FriendId::from(id),
            name: name.to_string(),
            image: format!("{}?u={}", avatar_base, id),
            balance,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn seed_friends_in_order_with_avatars() {
        let friends = initial_friends("https://i.pravatar.cc/48");
        let summary: Vec<(&str, f64)> = friends.iter().map(|f| (f.name.as_str(), f.balance)).collect();
        assert_eq!(summary, vec![("Clark", -7.0), ("Sarah", 20.0), ("Anthony", 0.0)]);
        assert_eq!(friends[0].image, "https://i.pravatar.cc/48?u=118836");
        assert_eq!(friends[2].id.to_string(), "499476");
    }
}
