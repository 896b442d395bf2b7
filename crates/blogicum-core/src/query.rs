//! Post selection rules shared by every listing.
//!
//! A [`PostQuery`] describes which posts a listing shows; repositories
//! translate it into SQL or evaluate it with [`PostQuery::matches`].

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::domain::{Category, Post};

/// Whether `post` is visible to the public at `now`.
///
/// A post needs to be published, dated no later than `now`, and filed under
/// a published category. Posts without a category never qualify.
pub fn is_publicly_visible(post: &Post, category: Option<&Category>, now: DateTime<Utc>) -> bool {
    post.is_published
        && post.pub_date <= now
        && category.is_some_and(|c| c.is_published)
}

/// Whether `viewer` may open the post: authors always can.
pub fn is_visible_to(
    post: &Post,
    category: Option<&Category>,
    viewer: Option<i64>,
    now: DateTime<Utc>,
) -> bool {
    viewer == Some(post.author_id) || is_publicly_visible(post, category, now)
}

/// Listing order: newest `pub_date` first, ties broken by id.
pub fn newest_first(a: &Post, b: &Post) -> Ordering {
    b.pub_date.cmp(&a.pub_date).then_with(|| b.id.cmp(&a.id))
}

/// Filter for post listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    pub author_id: Option<i64>,
    pub category_id: Option<i64>,
    /// When set, only posts publicly visible at this instant are selected.
    pub visible_at: Option<DateTime<Utc>>,
}

impl PostQuery {
    /// Posts the public may see at `now`.
    pub fn published(now: DateTime<Utc>) -> Self {
        Self {
            visible_at: Some(now),
            ..Self::default()
        }
    }

    /// Every post of one author, drafts and scheduled posts included.
    pub fn all_by_author(author_id: i64) -> Self {
        Self {
            author_id: Some(author_id),
            ..Self::default()
        }
    }

    /// The profile page query: owners see everything they wrote, other
    /// viewers only what is published.
    pub fn for_profile(author_id: i64, viewer: Option<i64>, now: DateTime<Utc>) -> Self {
        if viewer == Some(author_id) {
            Self::all_by_author(author_id)
        } else {
            Self::published(now).by_author(author_id)
        }
    }

    pub fn by_author(mut self, author_id: i64) -> Self {
        self.author_id = Some(author_id);
        self
    }

    pub fn in_category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Evaluate the filter against one post and its category.
    pub fn matches(&self, post: &Post, category: Option<&Category>) -> bool {
        if self.author_id.is_some_and(|id| id != post.author_id) {
            return false;
        }
        if self.category_id.is_some() && self.category_id != post.category_id {
            return false;
        }
        match self.visible_at {
            Some(now) => is_publicly_visible(post, category, now),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn category(is_published: bool) -> Category {
        Category {
            id: 1,
            title: "Travel".to_string(),
            description: String::new(),
            slug: "travel".to_string(),
            is_published,
            created_at: Utc::now(),
        }
    }

    fn post(author_id: i64, is_published: bool, pub_date: DateTime<Utc>) -> Post {
        Post {
            id: 10,
            title: "Title".to_string(),
            text: "Text".to_string(),
            pub_date,
            is_published,
            author_id,
            category_id: Some(1),
            location_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_visibility_requires_every_condition() {
        let now = Utc::now();
        let past = now - TimeDelta::hours(1);
        let future = now + TimeDelta::hours(1);

        assert!(is_publicly_visible(&post(1, true, past), Some(&category(true)), now));
        assert!(is_publicly_visible(&post(1, true, now), Some(&category(true)), now));
        assert!(!is_publicly_visible(&post(1, false, past), Some(&category(true)), now));
        assert!(!is_publicly_visible(&post(1, true, past), Some(&category(false)), now));
        assert!(!is_publicly_visible(&post(1, true, future), Some(&category(true)), now));
        assert!(!is_publicly_visible(&post(1, true, past), None, now));
    }

    #[test]
    fn test_author_always_sees_own_post() {
        let now = Utc::now();
        let draft = post(7, false, now + TimeDelta::days(3));

        assert!(is_visible_to(&draft, None, Some(7), now));
        assert!(!is_visible_to(&draft, None, Some(8), now));
        assert!(!is_visible_to(&draft, None, None, now));
    }

    #[test]
    fn test_profile_query_depends_on_viewer() {
        let now = Utc::now();

        assert_eq!(PostQuery::for_profile(3, Some(3), now), PostQuery::all_by_author(3));
        assert_eq!(
            PostQuery::for_profile(3, Some(4), now),
            PostQuery {
                author_id: Some(3),
                category_id: None,
                visible_at: Some(now),
            }
        );
        assert_eq!(
            PostQuery::for_profile(3, None, now),
            PostQuery::published(now).by_author(3)
        );
    }

    #[test]
    fn test_matches_applies_author_and_category() {
        let now = Utc::now();
        let visible = post(1, true, now - TimeDelta::minutes(5));
        let cat = category(true);

        assert!(PostQuery::published(now).matches(&visible, Some(&cat)));
        assert!(PostQuery::published(now).in_category(1).matches(&visible, Some(&cat)));
        assert!(!PostQuery::published(now).in_category(2).matches(&visible, Some(&cat)));
        assert!(!PostQuery::all_by_author(2).matches(&visible, Some(&cat)));

        let draft = post(1, false, now);
        assert!(PostQuery::all_by_author(1).matches(&draft, None));
        assert!(!PostQuery::published(now).by_author(1).matches(&draft, Some(&cat)));
    }

    #[test]
    fn test_newest_first_orders_by_pub_date_then_id() {
        let now = Utc::now();
        let mut older = post(1, true, now - TimeDelta::days(1));
        older.id = 1;
        let mut newer = post(1, true, now);
        newer.id = 2;
        let mut tie = post(1, true, now);
        tie.id = 3;

        let mut posts = vec![older.clone(), newer.clone(), tie.clone()];
        posts.sort_by(newest_first);

        let ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }
}
