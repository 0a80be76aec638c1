/// Shown whenever an item or collection has no usable image URI.
pub const FALLBACK_IMAGE: &str =
    "https://res.cloudinary.com/melvin-manni/image/upload/v1660322565/fgpwgssbhq2bfmsjerur.png";

const IPFS_SCHEME: &str = "ipfs://";

/// Rewrites an `ipfs://` URI to an HTTP gateway URL. Empty input yields the
/// fallback placeholder image; anything else passes through untouched.
pub fn transform_uri(uri: &str, gateway: &str) -> String {
    if uri.is_empty() {
        return FALLBACK_IMAGE.to_string();
    }
    match uri.strip_prefix(IPFS_SCHEME) {
        Some(hash) => format!("{}{}", gateway, hash),
        None => uri.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GATEWAY: &str = "https://cloudflare-ipfs.com/ipfs/";

    #[test]
    fn empty_uri_yields_placeholder() {
        assert_eq!(transform_uri("", GATEWAY), FALLBACK_IMAGE);
    }

    #[test]
    fn ipfs_uri_is_rewritten_to_gateway() {
        assert_eq!(
            transform_uri("ipfs://QmT8paAUaWD5D2umE7Kt2NYhgHVgf5PASdmDyyWf8iVbDp", GATEWAY),
            "https://cloudflare-ipfs.com/ipfs/QmT8paAUaWD5D2umE7Kt2NYhgHVgf5PASdmDyyWf8iVbDp"
        );
    }

    #[test]
    fn http_uri_passes_through() {
        let uri = "https://example.org/image.png";
        assert_eq!(transform_uri(uri, GATEWAY), uri);
    }
}
