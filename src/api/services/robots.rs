//! robots.txt 与 sitemap

use actix_web::{HttpResponse, web};

use crate::config::SiteConfig;

pub fn render_robots(site: &SiteConfig) -> String {
    let base = site.base_url.trim_end_matches('/');
    format!(
        "User-agent: *\nAllow: /\nDisallow: /admin\nDisallow: /api/\n\nSitemap: {}/sitemap.xml\n",
        base
    )
}

pub fn render_sitemap(site: &SiteConfig) -> String {
    let base = site.base_url.trim_end_matches('/');
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for page in &site.pages {
        let path = if page.starts_with('/') {
            page.clone()
        } else {
            format!("/{}", page)
        };
        xml.push_str(&format!(
            "  <url><loc>{}</loc></url>\n",
            escape_xml(&format!("{}{}", base, path))
        ));
    }
    xml.push_str("</urlset>\n");
    xml
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// GET /api/robots
pub async fn robots(site: web::Data<SiteConfig>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(render_robots(&site))
}

/// GET /api/sitemap
pub async fn sitemap(site: web::Data<SiteConfig>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/xml; charset=utf-8")
        .body(render_sitemap(&site))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteConfig {
        SiteConfig {
            base_url: "https://imperial.dev/".to_string(),
            pages: vec!["/".to_string(), "projects?a=1&b=2".to_string()],
        }
    }

    #[test]
    fn test_robots_has_sitemap_line() {
        let text = render_robots(&site());
        assert!(text.starts_with("User-agent: *"));
        assert!(text.contains("Sitemap: https://imperial.dev/sitemap.xml"));
    }

    #[test]
    fn test_sitemap_escapes_urls() {
        let xml = render_sitemap(&site());
        assert!(xml.contains("<loc>https://imperial.dev/</loc>"));
        assert!(xml.contains("<loc>https://imperial.dev/projects?a=1&amp;b=2</loc>"));
    }
}
