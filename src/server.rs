use anyhow::Result;
use axum::{
    extract::Form,
    response::{Html, IntoResponse},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use std::path::Path;

use delivery_order_merger::{run, CompanyConfig, Logger};

#[tokio::main]
async fn main() -> Result<()> {
    let app = Router::new()
        .route("/", get(index))
        .route("/run", post(run_pipeline));

    let port = std::env::var("PORT").unwrap_or_else(|_| "3002".to_string());
    let addr = format!("0.0.0.0:{}", port);

    println!("🚀 送货单合并服务启动中...");
    println!("📍 服务地址: http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    println!("✅ 服务启动成功！");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn index() -> impl IntoResponse {
    Html(
        r#"<!doctype html>
<html lang="zh-CN">
<head>
<meta charset="utf-8"/>
<title>送货单合并系统</title>
<meta name="viewport" content="width=device-width, initial-scale=1"/>
<style>
body{font-family:-apple-system,BlinkMacSystemFont,Segoe UI,Roboto,Helvetica,Arial,sans-serif;padding:24px;}
.card{max-width:680px;margin:0 auto;border:1px solid #e5e7eb;border-radius:12px;padding:24px;box-shadow:0 10px 25px rgba(0,0,0,0.05)}
label{display:block;margin:12px 0 6px;color:#374151}
input[type=text]{width:100%;padding:10px;border:1px solid #d1d5db;border-radius:8px}
button{margin-top:16px;padding:10px 16px;background:#2563eb;color:white;border:none;border-radius:8px;cursor:pointer}
small{color:#6b7280}
</style>
</head>
<body>
<div class="card">
  <h2>送货单合并系统</h2>
  <form action="/run" method="post">
    <label>送货单目录</label>
    <input name="source_dir" type="text" value="raw-data" required />
    <label>输出目录</label>
    <input name="output_dir" type="text" value="output" required />
    <label>公司信息配置文件（可选，JSON）</label>
    <input name="config" type="text" placeholder="例如：config.json"/>
    <button type="submit">开始合并</button>
    <div><small>提示：已存在的对账单不会被覆盖。</small></div>
  </form>
</div>
</body>
</html>"#,
    )
}

#[derive(Deserialize)]
struct RunParams {
    source_dir: String,
    output_dir: String,
    #[serde(default)]
    config: String,
}

/// 整条流水线在阻塞线程上跑，日志走通道，跑完一次性返回
async fn run_pipeline(Form(params): Form<RunParams>) -> impl IntoResponse {
    let worker = tokio::task::spawn_blocking(move || {
        let config = if params.config.trim().is_empty() {
            CompanyConfig::default()
        } else {
            match CompanyConfig::load_from_file(params.config.trim()) {
                Ok(c) => c,
                Err(e) => return format!("生成失败：{:#}", e),
            }
        };

        let (log, rx) = Logger::channel();
        let outcome = run(
            Path::new(&params.source_dir),
            Path::new(&params.output_dir),
            &config,
            &log,
        );
        drop(log);
        let lines: Vec<String> = rx.iter().collect();

        match outcome {
            Ok(stats) => format!(
                "处理完成：新生成 {} 个对账单，跳过 {} 个\n\n{}",
                stats.generated,
                stats.skipped,
                lines.join("\n")
            ),
            Err(e) => format!("生成失败：{:#}\n\n{}", e, lines.join("\n")),
        }
    });

    match worker.await {
        Ok(text) => text,
        Err(e) => format!("生成失败：{}", e),
    }
}
