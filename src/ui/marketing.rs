//! Landing page sections: hero, features, how-it-works, footer.

use chrono::{Datelike, Utc};

use super::icons::Icon;

struct Feature {
    title: &'static str,
    description: &'static str,
    icon: Icon,
}

const FEATURES: &[Feature] = &[
    Feature {
        title: "Contextual Understanding",
        description: "Our AI understands the context of your questions based on your uploaded documents.",
        icon: Icon::Bot,
    },
    Feature {
        title: "Multiple File Formats",
        description: "Upload documents in PDF, DOCX, and TXT formats for seamless analysis.",
        icon: Icon::FileText,
    },
    Feature {
        title: "Semantic Search",
        description: "Advanced retrieval system that understands the meaning behind your questions.",
        icon: Icon::Search,
    },
    Feature {
        title: "Lightning Fast",
        description: "Get instant answers to your queries with our optimized RAG system.",
        icon: Icon::Zap,
    },
    Feature {
        title: "Knowledge Base",
        description: "Build your own knowledge base by uploading domain-specific documents.",
        icon: Icon::Layers,
    },
    Feature {
        title: "Secure Processing",
        description: "Your documents are processed securely and not shared with third parties.",
        icon: Icon::Lock,
    },
];

const STEPS: &[(Icon, &str, &str)] = &[
    (
        Icon::Upload,
        "1. Upload Documents",
        "Upload your PDF, DOCX, or TXT files through our intuitive interface.",
    ),
    (
        Icon::Database,
        "2. AI Processing",
        "Our system analyzes and indexes your documents for quick retrieval.",
    ),
    (
        Icon::Bot,
        "3. Ask Questions",
        "Get accurate answers based on the content of your documents.",
    ),
];

/// Hero section with the two calls to action.
#[must_use]
pub fn hero() -> String {
    format!(
        r#"<section class="hero">
    <div class="container-custom hero-inner">
        <div class="hero-glow"></div>
        <div class="hero-copy">
            <div class="pill"><span class="pill-dot"></span>Powered by LangChain &amp; Together AI</div>
            <h1 class="heading-xl"><span class="text-gradient">Intelligent</span> document Q&amp;A<br>with RAG technology</h1>
            <p class="lead">Upload your documents and instantly get accurate answers through our advanced RAG-powered chatbot. Perfect for research, analysis, and knowledge extraction.</p>
            <div class="hero-actions">
                <a href="/chat" class="btn-primary">Start chatting {arrow}</a>
                <a href="/chat?upload=true" class="btn-secondary">Upload documents</a>
            </div>
        </div>
    </div>
</section>"#,
        arrow = Icon::ArrowRight.svg(18, ""),
    )
}

/// Feature grid.
#[must_use]
pub fn features() -> String {
    let cards: String = FEATURES
        .iter()
        .map(|f| {
            format!(
                r#"<div class="glass-card feature-card"><div class="feature-icon">{icon}</div><h3>{title}</h3><p>{description}</p></div>"#,
                icon = f.icon.svg(24, "text-primary"),
                title = f.title,
                description = f.description,
            )
        })
        .collect();

    format!(
        r#"<section class="section-padding bg-secondary">
    <div class="container-custom">
        <div class="section-header">
            <h2 class="heading-lg">Powerful RAG Features</h2>
            <p class="lead">Our platform combines the power of Retrieval Augmented Generation with intuitive design to provide the best document Q&amp;A experience.</p>
        </div>
        <div class="feature-grid">{cards}</div>
    </div>
</section>"#
    )
}

/// Three-step explainer.
#[must_use]
pub fn how_it_works() -> String {
    let steps: String = STEPS
        .iter()
        .map(|(icon, title, text)| {
            format!(
                r#"<div class="step"><div class="step-icon">{}</div><h3>{title}</h3><p>{text}</p></div>"#,
                icon.svg(28, "text-primary")
            )
        })
        .collect();

    format!(
        r#"<section class="section-padding">
    <div class="container-custom">
        <div class="section-header">
            <h2 class="heading-lg">How It Works</h2>
            <p class="lead">Our advanced RAG system makes it easy to extract insights from your documents in just a few simple steps.</p>
        </div>
        <div class="step-grid">{steps}</div>
    </div>
</section>"#
    )
}

/// Site footer.
#[must_use]
pub fn footer() -> String {
    let year = Utc::now().year();
    format!(
        r##"<footer class="footer">
    <div class="container-custom">
        <div class="footer-top">
            <div>
                <span class="text-gradient brand">LangRAG</span>
                <p class="muted">Powered by LangChain and Together AI</p>
            </div>
            <div class="footer-links">
                <a href="/">Home</a>
                <a href="/chat">Chat</a>
                <a href="#">GitHub</a>
            </div>
        </div>
        <div class="footer-bottom">&copy; {year} LangRAG. All rights reserved.</div>
    </div>
</footer>"##
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_features_renders_every_card() {
        let html = features();
        assert_eq!(html.matches("feature-card").count(), FEATURES.len());
        assert!(html.contains("Semantic Search"));
    }

    #[test]
    fn test_hero_links_to_both_modes() {
        let html = hero();
        assert!(html.contains(r#"href="/chat""#));
        assert!(html.contains(r#"href="/chat?upload=true""#));
    }

    #[test]
    fn test_footer_has_current_year() {
        assert!(footer().contains(&Utc::now().year().to_string()));
    }

    #[test]
    fn test_footer_links() {
        let html = footer();
        assert!(html.contains(r##"<a href="#">GitHub</a>"##));
        assert!(html.trim_end().ends_with("</footer>"));
    }
}
