use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::{Html, IntoResponse};
use axum::Json;
use sentihotel::{Sentiment, ThresholdPolicy};
use serde::{Deserialize, Serialize};

/// Request body for `POST /analyze` (same shape as the prediction API).
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub review: String,
}

/// Result the dashboard page renders as a styled card. Labels are capitalized
/// for display; `celebrate` drives the balloon animation on a positive result.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub sentiment: String,
    pub confidence: f32,
    pub headline: String,
    pub detail: String,
    pub celebrate: bool,
}

/// Serve the dashboard page.
pub async fn page() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

/// Serve the model explainer page (`GET /about`).
pub async fn about() -> Html<&'static str> {
    Html(ABOUT_HTML)
}

/// Classify one review with the binary policy for the dashboard.
///
/// Blank input gets the same 400 treatment as the API; the page shows the
/// error body as an inline banner.
pub async fn analyze(
    State(state): State<AppState>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(request) = body.map_err(|e| ApiError::Internal(e.body_text()))?;

    if request.review.trim().is_empty() {
        return Err(ApiError::NoReview);
    }

    let models = state.registry.get_or_load().await.map_err(ApiError::Model)?;
    let prediction = sentihotel::predict_review(&models, &request.review, ThresholdPolicy::Binary)?
        .ok_or(ApiError::NoReview)?;

    let positive = prediction.sentiment == Sentiment::Positive;
    let (headline, detail) = if positive {
        (
            "😊 Positive Experience",
            "This review indicates the guest enjoyed their stay.",
        )
    } else {
        (
            "☹️ Negative Experience",
            "This review indicates the guest had complaints.",
        )
    };

    Ok(Json(AnalyzeResponse {
        sentiment: prediction.sentiment.to_string(),
        confidence: prediction.confidence,
        headline: headline.to_string(),
        detail: detail.to_string(),
        celebrate: positive,
    }))
}

const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Senti Hotel</title>
<style>
  body { font-family: 'Poppins', sans-serif; background-color: #fdfcf0; color: #000; margin: 0; }
  main { max-width: 640px; margin: 40px auto; padding: 0 16px; }
  h1 { font-weight: 700; }
  textarea {
    width: 100%; min-height: 150px; box-sizing: border-box;
    background: #fff; color: #000; border: 2px solid #000; border-radius: 12px;
    padding: 12px; font-size: 15px; box-shadow: 0 4px 10px rgba(0,0,0,0.05);
  }
  textarea::placeholder { color: #888; font-style: italic; }
  button {
    width: 100%; margin-top: 12px; padding: 10px; font-weight: 600; font-size: 16px;
    background: #4ecdc4; color: #000; border: 1px solid #333; border-radius: 10px; cursor: pointer;
  }
  button:hover { background: #45b7af; color: #fff; border-color: #000; }
  .result-card {
    padding: 20px; border-radius: 15px; text-align: center; margin-top: 20px;
    box-shadow: 0 4px 6px rgba(0,0,0,0.1); display: none;
  }
  .result-card.positive { background: #d4edda; color: #155724; border: 2px solid #c3e6cb; }
  .result-card.negative { background: #f8d7da; color: #721c24; border: 2px solid #f5c6cb; }
  .result-card.error { background: #fff3cd; color: #856404; border: 2px solid #ffeeba; }
  .balloon { position: fixed; bottom: -40px; font-size: 32px; animation: rise 3s ease-in forwards; }
  @keyframes rise { to { transform: translateY(-110vh); } }
</style>
</head>
<body>
<main>
  <h1>🏨 Senti Hotel</h1>
  <p>Enter a hotel review below to analyze it instantly.</p>
  <textarea id="review" placeholder="type here..."></textarea>
  <button id="go">Analyze Sentiment</button>
  <div id="card" class="result-card"></div>
  <p><a href="/about">💡 About the Model</a></p>
</main>
<script>
const card = document.getElementById('card');
document.getElementById('go').addEventListener('click', async () => {
  const review = document.getElementById('review').value;
  card.style.display = 'none';
  try {
    const res = await fetch('/analyze', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({ review }),
    });
    const data = await res.json();
    if (!res.ok) {
      card.className = 'result-card error';
      card.innerHTML = '<h2>' + (data.error || 'Something went wrong') + '</h2>';
      card.style.display = 'block';
      return;
    }
    card.className = 'result-card ' + data.sentiment.toLowerCase();
    card.innerHTML = '<h2>' + data.headline + '</h2>'
      + '<p style="font-size:18px">Confidence: <b>' + (data.confidence * 100).toFixed(1) + '%</b></p>'
      + '<p>' + data.detail + '</p>';
    card.style.display = 'block';
    if (data.celebrate) celebrate();
  } catch (e) {
    card.className = 'result-card error';
    card.innerHTML = '<h2>Request failed</h2><p>' + e + '</p>';
    card.style.display = 'block';
  }
});
function celebrate() {
  for (let i = 0; i < 12; i++) {
    const b = document.createElement('div');
    b.className = 'balloon';
    b.textContent = '🎈';
    b.style.left = (5 + Math.random() * 90) + '%';
    b.style.animationDelay = (Math.random() * 0.8) + 's';
    document.body.appendChild(b);
    setTimeout(() => b.remove(), 4000);
  }
}
</script>
</body>
</html>
"#;

const ABOUT_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>About This AI - Senti Hotel</title>
<style>
  body { font-family: 'Poppins', sans-serif; background-color: #fdfcf0; color: #000; margin: 0; }
  main { max-width: 640px; margin: 40px auto; padding: 0 16px; }
  h1 { font-weight: 700; }
  .columns { display: flex; gap: 16px; flex-wrap: wrap; }
  .column {
    flex: 1; min-width: 240px; background: #fff; border: 2px solid #000; border-radius: 12px;
    padding: 16px; box-shadow: 0 4px 10px rgba(0,0,0,0.05);
  }
  .column .caption { color: #888; font-style: italic; font-size: 13px; }
  .benefit {
    background: #d1ecf1; color: #0c5460; border: 2px solid #bee5eb; border-radius: 10px;
    padding: 10px 14px; margin-top: 10px;
  }
  a { color: #0c5460; }
</style>
</head>
<body>
<main>
  <h1>💡 About This AI</h1>
  <h3>How it Works</h3>
  <p>This application uses a sophisticated Deep Learning architecture.</p>
  <div class="columns">
    <div class="column">
      <h3>1. The Encoder</h3>
      <p><b>Multilingual Sentence Encoder</b></p>
      <p class="caption">distiluse-base-multilingual-cased-v2</p>
      <p>Converts text into numbers (512-dimension embeddings). Supports English, Spanish, French, Chinese, etc.</p>
    </div>
    <div class="column">
      <h3>2. The Brain</h3>
      <p><b>LSTM (Long Short-Term Memory)</b></p>
      <p>A Recurrent Neural Network that understands the sequence and context of words.</p>
    </div>
  </div>
  <hr>
  <h3>✨ Benefits</h3>
  <div class="benefit">⚡ <b>Instant Analysis</b>: Process thousands of reviews in seconds.</div>
  <div class="benefit">🌍 <b>Multilingual</b>: Understands multiple languages.</div>
  <p><a href="/">← Back to the review checker</a></p>
</main>
</body>
</html>
"#;
