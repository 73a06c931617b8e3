use mime::Mime;

/// How an error is shown to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    Json,
    Html,
}

impl Representation {
    /// HTML only when the caller accepts it with a strictly higher quality
    /// than any structured type. A missing or empty header means JSON, and
    /// so does `*/*`.
    pub fn negotiate(accept: Option<&str>) -> Self {
        let Some(accept) = accept.filter(|a| !a.trim().is_empty()) else {
            return Representation::Json;
        };

        let mut html = 0.0_f32;
        let mut json = 0.0_f32;

        for range in accept.split(',') {
            let Ok(mime) = range.trim().parse::<Mime>() else {
                log::debug!("Skipping unparsable media range '{}'", range);
                continue;
            };

            let quality = quality(&mime);
            if quality <= 0.0 {
                continue;
            }

            if is_html(&mime) {
                html = html.max(quality);
            } else if is_structured(&mime) {
                json = json.max(quality);
            }
        }

        if html > json {
            Representation::Html
        } else {
            Representation::Json
        }
    }
}

fn quality(mime: &Mime) -> f32 {
    mime.get_param("q")
        .and_then(|q| q.as_str().parse::<f32>().ok())
        .unwrap_or(1.0)
}

fn is_html(mime: &Mime) -> bool {
    mime.type_() == mime::TEXT && (mime.subtype() == mime::HTML || mime.subtype() == mime::STAR)
}

fn is_structured(mime: &Mime) -> bool {
    let (type_, subtype) = (mime.type_(), mime.subtype());

    (type_ == mime::STAR && subtype == mime::STAR)
        || (type_ == mime::APPLICATION && (subtype == mime::JSON || subtype == mime::STAR))
        || mime.suffix() == Some(mime::JSON)
}
