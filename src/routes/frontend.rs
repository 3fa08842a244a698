//! 前端静态资源路由
//!
//! 使用 rust-embed 嵌入前端构建产物（官网、后台、门户、监考台共用一个 SPA）：
//! - 未找到的页面路由返回 index.html
//! - `/api/` 下未匹配的请求返回 JSON 404，不回退到页面
//! - `frontend-custom/` 目录可覆盖嵌入文件（开发用）
//! - HTML 中的 `%SYSTEM_NAME%` 占位符替换为配置的系统名称

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use rust_embed::Embed;
use std::path::Path;

use crate::config::AppConfig;
use crate::models::{ApiResponse, ErrorCode};

/// 编译时从 frontend/dist/ 目录读取文件
#[derive(Embed)]
#[folder = "frontend/dist/"]
struct CampusAssets;

fn extension(path: &str) -> &str {
    Path::new(path)
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
}

/// 获取文件的 MIME 类型
fn get_mime_type(path: &str) -> &'static str {
    match extension(path) {
        "html" => "text/html; charset=utf-8",
        "js" | "mjs" => "application/javascript; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "json" | "map" => "application/json; charset=utf-8",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "pdf" => "application/pdf",
        "txt" => "text/plain; charset=utf-8",
        "webmanifest" => "application/manifest+json",
        _ => "application/octet-stream",
    }
}

/// 带 hash 的静态资源可以长期缓存
fn should_cache(path: &str) -> bool {
    matches!(
        extension(path),
        "js" | "css" | "woff" | "woff2" | "ttf" | "png" | "jpg" | "jpeg" | "gif" | "svg" | "webp"
    )
}

fn render_html(content: &[u8], config: &AppConfig) -> Vec<u8> {
    String::from_utf8_lossy(content)
        .replace("%SYSTEM_NAME%", &config.app.system_name)
        .into_bytes()
}

/// 获取文件内容（优先自定义目录，然后嵌入资源）
fn get_file(path: &str) -> Option<Vec<u8>> {
    std::fs::read(format!("./frontend-custom/{path}"))
        .ok()
        .or_else(|| CampusAssets::get(path).map(|f| f.data.to_vec()))
}

/// 前端资源请求处理
pub async fn serve_frontend(req: HttpRequest) -> ActixResult<HttpResponse> {
    if req.path().starts_with("/api/") {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Resource not found",
        )));
    }

    let path = req.match_info().query("tail").trim_start_matches('/');
    let (content, file_path) = match get_file(path).filter(|_| !path.is_empty()) {
        Some(content) => (Some(content), path),
        // SPA fallback
        None => (get_file("index.html"), "index.html"),
    };

    let Some(mut data) = content else {
        return Ok(HttpResponse::NotFound()
            .content_type("text/html; charset=utf-8")
            .body(
                r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Campus</title>
</head>
<body>
    <h1>Frontend Not Found</h1>
    <p>The frontend assets have not been built or embedded.</p>
    <pre>cd frontend && bun run build</pre>
</body>
</html>"#,
            ));
    };

    let mime = get_mime_type(file_path);
    if mime.starts_with("text/html") {
        data = render_html(&data, AppConfig::get());
    }

    let cache_control = if should_cache(file_path) {
        "public, max-age=31536000, immutable"
    } else {
        "no-cache, no-store, must-revalidate"
    };

    Ok(HttpResponse::Ok()
        .content_type(mime)
        .insert_header(("Cache-Control", cache_control))
        .body(data))
}

/// 配置前端路由
pub fn configure_frontend_routes(cfg: &mut web::ServiceConfig) {
    // 所有未匹配的 GET 请求交给前端处理
    cfg.route("/{tail:.*}", web::get().to(serve_frontend));
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::{TestRequest, call_service, init_service};
    use actix_web::{App, http::StatusCode};

    #[test]
    fn test_get_mime_type() {
        assert_eq!(get_mime_type("index.html"), "text/html; charset=utf-8");
        assert_eq!(
            get_mime_type("assets/app.mjs"),
            "application/javascript; charset=utf-8"
        );
        assert_eq!(get_mime_type("unknown.xyz"), "application/octet-stream");
    }

    #[test]
    fn test_should_cache() {
        assert!(should_cache("assets/app.js"));
        assert!(!should_cache("index.html"));
        assert!(!should_cache("manifest.json"));
    }

    #[actix_web::test]
    async fn test_unknown_api_path_is_json_404() {
        let app = init_service(App::new().configure(configure_frontend_routes)).await;
        let req = TestRequest::get().uri("/api/nope").to_request();
        let res = call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            res.headers().get("content-type").unwrap(),
            "application/json"
        );
    }
}
