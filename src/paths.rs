use crate::models::TweetId;

pub fn like_path(id: TweetId) -> String {
    format!("/tweets/{id}/like/")
}

pub fn unlike_path(id: TweetId) -> String {
    format!("/tweets/{id}/unlike/")
}

/// Path a like button should POST to next, given whether the viewer likes the tweet now.
pub fn action_path(id: TweetId, is_liked: bool) -> String {
    if is_liked { unlike_path(id) } else { like_path(id) }
}

/// Value of the `name` attribute carried by a tweet's counter display.
pub fn counter_name(id: TweetId) -> String {
    format!("count_{id}")
}
