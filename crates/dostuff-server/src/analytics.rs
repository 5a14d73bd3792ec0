//! Analytics tags for the page head and body.

use tracing::warn;

use crate::config::AnalyticsConfig;

/// Ids are interpolated into inline scripts, so only a conservative
/// character set is allowed through.
fn is_safe_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// The configured id for `tag`, if it passes [`is_safe_id`].
fn checked<'a>(tag: &str, id: Option<&'a str>) -> Option<&'a str> {
    let id = id?;
    if is_safe_id(id) {
        Some(id)
    } else {
        warn!(tag, id, "ignoring malformed analytics id");
        None
    }
}

fn google_analytics(id: &str) -> String {
    format!(
        "<script async src=\"https://www.googletagmanager.com/gtag/js?id={id}\"></script>\n\
         <script>window.dataLayer=window.dataLayer||[];\
         function gtag(){{dataLayer.push(arguments);}}\
         gtag('js',new Date());gtag('config','{id}');</script>\n"
    )
}

fn tag_manager(id: &str) -> String {
    format!(
        "<script>(function(w,d,s,l,i){{w[l]=w[l]||[];w[l].push({{'gtm.start':\
         new Date().getTime(),event:'gtm.js'}});var f=d.getElementsByTagName(s)[0],\
         j=d.createElement(s),dl=l!='dataLayer'?'&l='+l:'';j.async=true;j.src=\
         'https://www.googletagmanager.com/gtm.js?id='+i+dl;f.parentNode.insertBefore(j,f);\
         }})(window,document,'script','dataLayer','{id}');</script>\n"
    )
}

fn meta_pixel(id: &str) -> String {
    format!(
        "<script>!function(f,b,e,v,n,t,s){{if(f.fbq)return;n=f.fbq=function(){{n.callMethod?\
         n.callMethod.apply(n,arguments):n.queue.push(arguments)}};\
         if(!f._fbq)f._fbq=n;n.push=n;n.loaded=!0;n.version='2.0';\
         n.queue=[];t=b.createElement(e);t.async=!0;\
         t.src=v;s=b.getElementsByTagName(e)[0];\
         s.parentNode.insertBefore(t,s)}}(window,document,'script',\
         'https://connect.facebook.net/en_US/fbevents.js');\
         fbq('init','{id}');fbq('track','PageView');</script>\n"
    )
}

fn linkedin_insight(id: &str) -> String {
    format!(
        "<script>_linkedin_partner_id=\"{id}\";\
         (function(){{var s=document.getElementsByTagName(\"script\")[0];\
         var b=document.createElement(\"script\");\
         b.type=\"text/javascript\";b.async=true;\
         b.src=\"https://snap.licdn.com/li.lms-analytics/insight.min.js\";\
         s.parentNode.insertBefore(b,s);}})();</script>\n"
    )
}

fn clarity(id: &str) -> String {
    format!(
        "<script>(function(c,l,a,r,i,t,y){{\
         c[a]=c[a]||function(){{(c[a].q=c[a].q||[]).push(arguments)}};\
         t=l.createElement(r);t.async=1;t.src=\"https://www.clarity.ms/tag/\"+i;\
         y=l.getElementsByTagName(r)[0];y.parentNode.insertBefore(t,y);\
         }})(window,document,\"clarity\",\"script\",\"{id}\");</script>\n"
    )
}

/// Loader snippets for every configured analytics id, in a fixed order:
/// Google Analytics, Tag Manager, Meta Pixel, LinkedIn Insight, Clarity.
///
/// Ids with characters outside `[A-Za-z0-9_-]` are dropped with a warning.
#[must_use]
pub fn head_snippets(config: &AnalyticsConfig) -> String {
    let loaders: [(&str, Option<&str>, fn(&str) -> String); 5] = [
        ("google_analytics", config.google_analytics_id.as_deref(), google_analytics),
        ("tag_manager", config.tag_manager_id.as_deref(), tag_manager),
        ("meta_pixel", config.meta_pixel_id.as_deref(), meta_pixel),
        ("linkedin", config.linkedin_partner_id.as_deref(), linkedin_insight),
        ("clarity", config.clarity_id.as_deref(), clarity),
    ];

    loaders
        .into_iter()
        .filter_map(|(tag, id, render)| checked(tag, id).map(render))
        .collect()
}

/// Tag Manager's `<noscript>` fallback, placed right after `<body>`.
#[must_use]
pub fn body_snippets(config: &AnalyticsConfig) -> String {
    checked("tag_manager", config.tag_manager_id.as_deref())
        .map(|id| {
            format!(
                "<noscript><iframe src=\"https://www.googletagmanager.com/ns.html?id={id}\" \
                 height=\"0\" width=\"0\" style=\"display:none;visibility:hidden\"></iframe></noscript>\n"
            )
        })
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn only(config: AnalyticsConfig) -> String {
        head_snippets(&config)
    }

    #[test]
    fn nothing_configured_emits_nothing() {
        assert!(head_snippets(&AnalyticsConfig::default()).is_empty());
        assert!(body_snippets(&AnalyticsConfig::default()).is_empty());
    }

    #[test]
    fn google_analytics_loader() {
        let html = only(AnalyticsConfig {
            google_analytics_id: Some("G-ABC123".into()),
            ..AnalyticsConfig::default()
        });
        assert!(html.contains("gtag/js?id=G-ABC123"));
        assert!(html.contains("gtag('config','G-ABC123')"));
    }

    #[test]
    fn tag_manager_loader_and_noscript_fallback() {
        let config = AnalyticsConfig {
            tag_manager_id: Some("GTM-K7Q2".into()),
            ..AnalyticsConfig::default()
        };
        let head = head_snippets(&config);
        assert!(head.contains("googletagmanager.com/gtm.js?id="));
        assert!(head.contains("'dataLayer','GTM-K7Q2')"));
        assert!(body_snippets(&config).contains("ns.html?id=GTM-K7Q2"));
    }

    #[test]
    fn meta_pixel_loader() {
        let html = only(AnalyticsConfig {
            meta_pixel_id: Some("1234567890".into()),
            ..AnalyticsConfig::default()
        });
        assert!(html.contains("connect.facebook.net/en_US/fbevents.js"));
        assert!(html.contains("fbq('init','1234567890')"));
    }

    #[test]
    fn linkedin_insight_loader() {
        let html = only(AnalyticsConfig {
            linkedin_partner_id: Some("556677".into()),
            ..AnalyticsConfig::default()
        });
        assert!(html.contains("_linkedin_partner_id=\"556677\""));
        assert!(html.contains("snap.licdn.com/li.lms-analytics/insight.min.js"));
    }

    #[test]
    fn clarity_loader() {
        let html = only(AnalyticsConfig {
            clarity_id: Some("k9x2m".into()),
            ..AnalyticsConfig::default()
        });
        assert!(html.contains("\"clarity\",\"script\",\"k9x2m\""));
    }

    #[test]
    fn loaders_keep_a_fixed_order() {
        let html = only(AnalyticsConfig {
            google_analytics_id: Some("G-1".into()),
            tag_manager_id: Some("GTM-1".into()),
            meta_pixel_id: Some("2".into()),
            linkedin_partner_id: Some("3".into()),
            clarity_id: Some("c4".into()),
        });
        let positions: Vec<usize> = ["gtag/js", "gtm.js", "fbevents.js", "insight.min.js", "clarity.ms"]
            .iter()
            .map(|marker| html.find(marker).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
    }

    #[test]
    fn unsafe_ids_are_dropped() {
        let config = AnalyticsConfig {
            google_analytics_id: Some("G-1');alert(1);//".into()),
            tag_manager_id: Some("GTM-\"><script>".into()),
            meta_pixel_id: Some(String::new()),
            linkedin_partner_id: Some("1 2".into()),
            clarity_id: None,
        };
        assert!(head_snippets(&config).is_empty());
        assert!(body_snippets(&config).is_empty());
    }
}
