//! Home Page

use leptos::prelude::*;

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="home">
            <section class="hero">
                <h1>"Sittin with Shireen"</h1>
                <p class="tagline">"Real conversations. Inspiring stories. Unforgettable moments."</p>
                <div class="hero-actions">
                    <a href="/videos" class="btn btn-primary">"Watch Now"</a>
                    <a href="/store" class="btn btn-outline">"Shop Merch"</a>
                </div>
            </section>

            <section class="about">
                <h2>"Welcome to the Show"</h2>
                <p>
                    "Hi, I'm Shireen! Welcome to my corner of the internet. I'm a talk show host passionate about bringing you authentic conversations, inspiring stories, and unforgettable moments. Join me as we sit down with amazing guests and explore topics that matter."
                </p>
                <p>
                    "Whether you're here for the videos, the podcast, or the exclusive merch, I'm so glad you're here. Let's make every conversation count!"
                </p>
            </section>

            <section class="features">
                <h2>"Explore the Show"</h2>
                <div class="feature-grid">
                    <a href="/videos" class="feature">
                        <h3>"Episodes"</h3>
                        <p>"Watch full episodes and highlights from Sittin with Shireen. New content added regularly!"</p>
                        <span class="feature-link">"Watch Now →"</span>
                    </a>
                    <a href="/store" class="feature">
                        <h3>"Merchandise"</h3>
                        <p>"Shop official Sittin with Shireen merchandise. Show your support in style!"</p>
                        <span class="feature-link">"Shop Now →"</span>
                    </a>
                    <a href="/podcast" class="feature">
                        <h3>"Podcast"</h3>
                        <p>"Listen to extended conversations and exclusive podcast content on the go."</p>
                        <span class="feature-link">"Listen Now →"</span>
                    </a>
                </div>
            </section>
        </div>
    }
}
