use crate::Error;
use url::Url;

fn invalid(message: &'static str) -> Error {
    Error::InvalidConfig {
        message: message.into(),
        source: None,
    }
}

/// Parse a Jenkins base URL and make sure its path ends with `/`, so that a context path
/// like `/jenkins` survives joining.
pub(crate) fn normalize_base_url(raw: &str) -> Result<Url, Error> {
    let mut url = Url::parse(raw.trim()).map_err(|err| Error::InvalidConfig {
        message: format!("invalid base_url {raw:?}").into(),
        source: Some(Box::new(err)),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("base_url must use http or https"));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("base_url must not include query or fragment"));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Append percent-encoded `segments` to `base_url`.
pub(crate) fn endpoint_url<'a, I>(base_url: &Url, segments: I) -> Result<Url, Error>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|_| invalid("base_url must be a hierarchical URL"))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Strip query, fragment and credentials before a URL ends up in an error.
pub(crate) fn sanitize_url_for_error(url: &Url) -> Url {
    let mut safe = url.clone();
    safe.set_query(None);
    safe.set_fragment(None);
    let _ = safe.set_username("");
    let _ = safe.set_password(None);
    safe
}
