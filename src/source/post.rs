//! Raw listing payloads and the picture candidates filtered out of them.
//!
//! Upstream posts carry dozens of fields; only `permalink` and `url` matter
//! here.  Each child of a listing is decoded on its own, so a single odd
//! entry (a cross-post, a promoted item, a shape we have never seen) is
//! dropped without affecting its neighbours.

use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;

/// Host that serves pictures uploaded directly to Reddit.
pub const DIRECT_IMAGE_HOST: &str = "i.redd.it";

/// One page of an upstream listing, as returned by `/r/<source>/<sort>.json`.
///
/// Children are kept as untyped JSON until [`filter_pictures`] inspects them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawListing {
    pub data: ListingData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingData {
    #[serde(default)]
    pub children: Vec<Value>,
}

impl RawListing {
    /// Build a listing from already-shaped child entries.
    pub fn from_children(children: Vec<Value>) -> Self {
        Self {
            data: ListingData { children },
        }
    }

    pub fn len(&self) -> usize {
        self.data.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.children.is_empty()
    }
}

#[derive(Deserialize)]
struct RawChild {
    data: RawPost,
}

#[derive(Deserialize)]
struct RawPost {
    permalink: String,
    #[serde(default)]
    url: Option<String>,
}

/// A post known to reference a directly-hosted picture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePost {
    /// Path of the post relative to the upstream site, e.g.
    /// `/r/pics/comments/abc123/title/`.
    pub permalink: String,

    /// Absolute URL of the picture. Its host is always [`DIRECT_IMAGE_HOST`].
    pub image_url: Url,
}

impl CandidatePost {
    /// Parse one listing child, returning `None` unless it is a picture post.
    fn from_child(child: Value) -> Option<Self> {
        let RawChild { data } = serde_json::from_value(child).ok()?;
        let image_url = Url::parse(data.url.as_deref()?).ok()?;
        if !matches!(image_url.scheme(), "http" | "https")
            || image_url.host_str() != Some(DIRECT_IMAGE_HOST)
        {
            return None;
        }
        Some(Self {
            permalink: data.permalink,
            image_url,
        })
    }

    /// Full permanent link to the post: `base` followed by the permalink.
    ///
    /// A trailing `/` on `base` is ignored so the result never contains `//`.
    pub fn canonical_url(&self, base: &str) -> String {
        format!("{}{}", base.trim_end_matches('/'), self.permalink)
    }
}

/// Keep only the picture posts of a listing, in upstream order.
///
/// Entries that fail to decode, lack a URL, or point anywhere other than
/// [`DIRECT_IMAGE_HOST`] are skipped.
pub fn filter_pictures(listing: RawListing) -> Vec<CandidatePost> {
    let total = listing.len();
    let pictures: Vec<CandidatePost> = listing
        .data
        .children
        .into_iter()
        .filter_map(CandidatePost::from_child)
        .collect();

    tracing::debug!(total, pictures = pictures.len(), "filtered listing");
    pictures
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn picture(n: usize) -> Value {
        json!({
            "kind": "t3",
            "data": {
                "url": format!("https://i.redd.it/picture{n}.jpg"),
                "permalink": format!("/r/pics/comments/{n}/title/"),
                "title": "ignored",
                "score": 42,
            }
        })
    }

    fn link_post() -> Value {
        json!({
            "kind": "t3",
            "data": {
                "url": "https://www.reddit.com/address/to/post",
                "permalink": "/r/pics/comments/link/title/",
            }
        })
    }

    #[test]
    fn keeps_only_direct_images() {
        let listing = RawListing::from_children(vec![link_post(), picture(1), link_post()]);
        let posts = filter_pictures(listing);

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].image_url.as_str(), "https://i.redd.it/picture1.jpg");
        assert_eq!(posts[0].permalink, "/r/pics/comments/1/title/");
    }

    #[test]
    fn preserves_upstream_order() {
        let listing = RawListing::from_children(vec![
            picture(3),
            link_post(),
            picture(1),
            picture(2),
        ]);
        let permalinks: Vec<_> = filter_pictures(listing)
            .into_iter()
            .map(|p| p.permalink)
            .collect();

        assert_eq!(
            permalinks,
            [
                "/r/pics/comments/3/title/",
                "/r/pics/comments/1/title/",
                "/r/pics/comments/2/title/",
            ]
        );
    }

    #[test]
    fn output_never_exceeds_input_and_hosts_match() {
        for pictures in 0..6 {
            for links in 0..6 {
                let mut children: Vec<Value> = (0..pictures).map(picture).collect();
                children.extend((0..links).map(|_| link_post()));
                let total = children.len();

                let posts = filter_pictures(RawListing::from_children(children));
                assert!(posts.len() <= total);
                assert_eq!(posts.len(), pictures);
                assert!(posts
                    .iter()
                    .all(|p| p.image_url.host_str() == Some(DIRECT_IMAGE_HOST)));
            }
        }
    }

    #[test]
    fn drops_malformed_entries() {
        let listing = RawListing::from_children(vec![
            json!({ "kind": "t3" }),
            json!({ "kind": "t3", "data": { "url": "https://i.redd.it/x.jpg" } }),
            json!({ "kind": "t3", "data": { "permalink": "/r/pics/no-url/" } }),
            json!({ "kind": "t3", "data": { "permalink": "/r/pics/null/", "url": null } }),
            json!({ "kind": "t3", "data": { "permalink": "/r/pics/bad/", "url": "not a url" } }),
            json!({ "kind": "t3", "data": { "permalink": 7, "url": "https://i.redd.it/y.jpg" } }),
            json!("just a string"),
            picture(9),
        ]);
        let posts = filter_pictures(listing);

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].permalink, "/r/pics/comments/9/title/");
    }

    #[test]
    fn host_must_match_exactly() {
        let lookalike = json!({
            "data": {
                "url": "https://i.redd.it.example.com/x.jpg",
                "permalink": "/r/pics/lookalike/",
            }
        });
        let preview = json!({
            "data": {
                "url": "https://preview.redd.it/x.jpg",
                "permalink": "/r/pics/preview/",
            }
        });
        let posts = filter_pictures(RawListing::from_children(vec![lookalike, preview]));
        assert!(posts.is_empty());
    }

    #[test]
    fn only_web_schemes_are_kept() {
        let child = |url: &str| json!({ "data": { "url": url, "permalink": "/r/pics/x/" } });
        let posts = filter_pictures(RawListing::from_children(vec![
            child("ftp://i.redd.it/x.jpg"),
            child("file://i.redd.it/x.jpg"),
            child("ws://i.redd.it/x.jpg"),
            child("http://i.redd.it/plain.jpg"),
            child("https://i.redd.it/secure.jpg"),
        ]));
        let urls: Vec<_> = posts.iter().map(|p| p.image_url.as_str()).collect();
        assert_eq!(urls, ["http://i.redd.it/plain.jpg", "https://i.redd.it/secure.jpg"]);
    }

    #[test]
    fn empty_listing_yields_nothing() {
        assert!(filter_pictures(RawListing::default()).is_empty());

        let listing: RawListing = serde_json::from_value(json!({
            "kind": "Listing",
            "data": { "dist": 0 }
        }))
        .unwrap();
        assert!(listing.is_empty());
        assert!(filter_pictures(listing).is_empty());
    }

    #[test]
    fn canonical_url_joins_base_and_permalink() {
        let post = CandidatePost {
            permalink: "/r/pics/comments/abc/title/".to_string(),
            image_url: Url::parse("https://i.redd.it/abc.jpg").unwrap(),
        };
        assert_eq!(
            post.canonical_url("https://www.reddit.com"),
            "https://www.reddit.com/r/pics/comments/abc/title/"
        );
        assert_eq!(
            post.canonical_url("https://www.reddit.com/"),
            "https://www.reddit.com/r/pics/comments/abc/title/"
        );
    }
}
