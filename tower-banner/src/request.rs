use std::net::IpAddr;

/// The multi-valued query parameter carrying category filters.
pub const CATEGORY_PARAM: &str = "category[]";

const CATEGORY_ALIAS: &str = "category";

/// A decoded banner request: which categories to draw from, and for whom.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BannerRequest {
    /// Requested category labels. Empty means any banner.
    pub categories: Vec<String>,
    /// Identity of the requesting client, used for repetition avoidance.
    pub client: String,
}

impl BannerRequest {
    pub fn new(client: impl Into<String>) -> Self {
        Self {
            categories: Vec::new(),
            client: client.into(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.push(category.into());
        self
    }

    /// Decodes category filters from a raw, still percent-encoded query string.
    ///
    /// Every `category[]` value is collected, in order. Plain `category` is
    /// accepted as well. Other parameters are ignored.
    pub fn from_query(query: Option<&str>, client: impl Into<String>) -> Self {
        let categories = query
            .map(|query| {
                form_urlencoded::parse(query.as_bytes())
                    .filter(|(key, _)| key == CATEGORY_PARAM || key == CATEGORY_ALIAS)
                    .map(|(_, value)| value.into_owned())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            categories,
            client: client.into(),
        }
    }

    /// Client identity for a peer address: the IP alone, so every connection from
    /// one host shares a history.
    pub fn client_id(ip: IpAddr) -> String {
        ip.to_string()
    }
}
