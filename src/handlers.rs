use crate::cookie::{CSRF_COOKIE, CSRF_HEADER, CsrfToken, get_cookie};
use crate::errors::AppError;
use crate::models::{
    AppData, CreateTweetRequest, FeedEntry, LikeResponse, MAX_CONTENT_CHARS, Tweet, TweetId,
};
use crate::paths::{action_path, like_path, unlike_path};
use crate::state::AppState;
use crate::storage::persist_data;
use crate::ui::render_index;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::Utc;
use tracing::info;

const USER_COOKIE: &str = "user";
const ANONYMOUS: &str = "anonymous";

pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, AppError> {
    let viewer = viewer(&headers);
    let entries = {
        let data = state.data.lock().await;
        data.feed().map(|tweet| to_entry(tweet, &viewer)).collect::<Vec<_>>()
    };
    let html = render_index(&viewer, &entries).map_err(AppError::internal)?;

    let token = request_cookie(&headers, CSRF_COOKIE)
        .map(CsrfToken::new)
        .unwrap_or_else(CsrfToken::generate);
    let cookie = format!("{CSRF_COOKIE}={}; Path=/; SameSite=Lax", token.as_str());
    Ok(([(header::SET_COOKIE, cookie)], Html(html)).into_response())
}

pub async fn list_tweets(State(state): State<AppState>, headers: HeaderMap) -> Json<Vec<FeedEntry>> {
    let viewer = viewer(&headers);
    let data = state.data.lock().await;
    Json(data.feed().map(|tweet| to_entry(tweet, &viewer)).collect())
}

pub async fn get_tweet(
    State(state): State<AppState>,
    Path(id): Path<TweetId>,
    headers: HeaderMap,
) -> Result<Json<FeedEntry>, AppError> {
    let viewer = viewer(&headers);
    let data = state.data.lock().await;
    let tweet = data.tweets.get(&id).ok_or(AppError::not_found(id))?;
    Ok(Json(to_entry(tweet, &viewer)))
}

pub async fn create_tweet(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateTweetRequest>,
) -> Result<(StatusCode, Json<FeedEntry>), AppError> {
    check_csrf(&headers)?;
    let viewer = viewer(&headers);
    let content = payload.content.trim();
    if content.is_empty() {
        return Err(AppError::bad_request("content must not be empty"));
    }
    if content.chars().count() > MAX_CONTENT_CHARS {
        return Err(AppError::bad_request(format!(
            "content must be at most {MAX_CONTENT_CHARS} characters"
        )));
    }

    let mut data = state.data.lock().await;
    let entry = commit(&state, &mut data, |data| {
        let id = data.next_id.max(1);
        data.next_id = id + 1;
        let tweet = Tweet {
            id,
            author: viewer.clone(),
            content: content.to_string(),
            created_at: Utc::now(),
            liked_by: Default::default(),
        };
        let entry = to_entry(&tweet, &viewer);
        data.tweets.insert(id, tweet);
        Ok(entry)
    })
    .await?;

    info!(tweet_id = entry.id, author = %viewer, "tweet created");
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Only the author may delete a tweet.
pub async fn delete_tweet(
    State(state): State<AppState>,
    Path(id): Path<TweetId>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    check_csrf(&headers)?;
    let viewer = viewer(&headers);

    let mut data = state.data.lock().await;
    commit(&state, &mut data, |data| {
        let tweet = data.tweets.get(&id).ok_or(AppError::not_found(id))?;
        if tweet.author != viewer {
            return Err(AppError::forbidden("only the author can delete a tweet"));
        }
        data.tweets.remove(&id);
        Ok(())
    })
    .await?;

    info!(tweet_id = id, author = %viewer, "tweet deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn like(
    State(state): State<AppState>,
    Path(id): Path<TweetId>,
    headers: HeaderMap,
) -> Result<Json<LikeResponse>, AppError> {
    apply_like(&state, &headers, id, true).await.map(Json)
}

pub async fn unlike(
    State(state): State<AppState>,
    Path(id): Path<TweetId>,
    headers: HeaderMap,
) -> Result<Json<LikeResponse>, AppError> {
    apply_like(&state, &headers, id, false).await.map(Json)
}

async fn apply_like(
    state: &AppState,
    headers: &HeaderMap,
    id: TweetId,
    liked: bool,
) -> Result<LikeResponse, AppError> {
    check_csrf(headers)?;
    let viewer = viewer(headers);

    let mut data = state.data.lock().await;
    let liked_count = commit(state, &mut data, |data| {
        let tweet = data.tweets.get_mut(&id).ok_or(AppError::not_found(id))?;
        if liked {
            tweet.liked_by.insert(viewer.clone());
        } else {
            tweet.liked_by.remove(&viewer);
        }
        Ok(tweet.liked_by.len() as u64)
    })
    .await?;

    info!(tweet_id = id, user = %viewer, liked, liked_count, "like state changed");

    Ok(LikeResponse {
        tweet_id: id,
        is_liked: liked,
        liked_count,
        like_url: (!liked).then(|| like_path(id)),
        unlike_url: liked.then(|| unlike_path(id)),
    })
}

/// Applies `change` to a copy of `data` and only swaps it in once the copy is
/// on disk, so a failed save leaves the served state untouched.
async fn commit<T>(
    state: &AppState,
    data: &mut AppData,
    change: impl FnOnce(&mut AppData) -> Result<T, AppError>,
) -> Result<T, AppError> {
    let mut next = data.clone();
    let output = change(&mut next)?;
    persist_data(&state.data_path, &next).await?;
    *data = next;
    Ok(output)
}

/// Double-submit check: the header must repeat the caller's own `csrftoken` cookie.
fn check_csrf(headers: &HeaderMap) -> Result<(), AppError> {
    let sent = headers
        .get(CSRF_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let expected = request_cookie(headers, CSRF_COOKIE).unwrap_or_default();
    if sent.is_empty() || expected.is_empty() || sent != expected {
        return Err(AppError::forbidden("CSRF token missing or incorrect"));
    }
    Ok(())
}

fn request_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|cookies| get_cookie(cookies, name))
        .filter(|value| !value.is_empty())
}

fn viewer(headers: &HeaderMap) -> String {
    request_cookie(headers, USER_COOKIE).unwrap_or_else(|| ANONYMOUS.to_string())
}

fn to_entry(tweet: &Tweet, viewer: &str) -> FeedEntry {
    let is_liked = tweet.liked_by.contains(viewer);
    FeedEntry {
        id: tweet.id,
        author: tweet.author.clone(),
        content: tweet.content.clone(),
        created_at: tweet.created_at,
        is_liked,
        liked_count: tweet.liked_by.len() as u64,
        action_url: action_path(tweet.id, is_liked),
    }
}
