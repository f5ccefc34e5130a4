//! cinescope - movie and TV catalog browser CLI.

/// Application configuration (TOML).
mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail, ensure};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::config::{AppConfig, ProviderKind, resolve_config_path};
use cinescope_api::identity::{
    Credentials, DemoIdentityProvider, FirebaseIdentityProvider, IdentityError,
    LocalIdentityProvider, Session, SignUpRequest,
};
use cinescope_api::tmdb::{
    CastMember, CatalogError, DetailError, DetailView, ImageUrls, Movie, MovieView, Paged,
    TmdbClient, TmdbService, TrendingItem, TtlCache, TvShow, TvShowView, Video,
    movie_detail_view, tv_show_detail_view,
};
use cinescope_store::{PageData, PageRequest, Selected, SliceName, ViewStore};

/// User-Agent sent to every upstream.
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Show a movie detail page.
    Movie(DetailArgs),
    /// Show a TV show detail page.
    Tv(DetailArgs),
    /// List movies by category.
    Movies(MovieListArgs),
    /// List TV shows by category.
    TvShows(TvListArgs),
    /// List today's trending movies, shows and people.
    TrendingAll(PageArgs),
    /// List movie genres.
    Genres,
    /// List movies in a genre.
    Genre(GenreArgs),
    /// Search movies or TV shows.
    Search(SearchArgs),
    /// Sign in and show the current identity.
    Whoami,
    /// Create an account with the configured provider.
    Signup(SignupArgs),
}

/// Arguments for `movie` and `tv`.
#[derive(clap::Args)]
struct DetailArgs {
    /// TMDB ID (positive integer).
    id: String,
}

/// Paging options shared by list commands.
#[derive(clap::Args, Clone, Copy)]
struct PageArgs {
    /// First page to load (1-based).
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    page: u32,
    /// Number of pages to load, appending each to the list.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pages: u32,
}

/// Movie categories.
#[derive(Clone, Copy, ValueEnum)]
enum MovieList {
    /// Most popular right now.
    Popular,
    /// Highest rated.
    TopRated,
    /// In theaters.
    NowPlaying,
    /// Upcoming theatrical releases.
    Upcoming,
    /// Trending theatrical releases.
    Trending,
}

/// Arguments for `movies`.
#[derive(clap::Args)]
struct MovieListArgs {
    /// Category.
    list: MovieList,
    #[command(flatten)]
    paging: PageArgs,
}

/// TV categories.
#[derive(Clone, Copy, ValueEnum)]
enum TvList {
    /// Most popular right now.
    Popular,
    /// Highest rated.
    TopRated,
    /// Airing in the next week.
    OnAir,
    /// Trending shows.
    Trending,
}

/// Arguments for `tv-shows`.
#[derive(clap::Args)]
struct TvListArgs {
    /// Category.
    list: TvList,
    #[command(flatten)]
    paging: PageArgs,
}

/// Arguments for `genre`.
#[derive(clap::Args)]
struct GenreArgs {
    /// Genre ID (see `genres`).
    id: u32,
    #[command(flatten)]
    paging: PageArgs,
}

/// What to search.
#[derive(Clone, Copy, ValueEnum)]
enum SearchKind {
    /// Movies.
    Movie,
    /// TV shows.
    Tv,
}

/// Arguments for `search`.
#[derive(clap::Args)]
struct SearchArgs {
    /// What to search.
    kind: SearchKind,
    /// Search query (e.g. "matrix").
    #[arg(long, required = true)]
    query: String,
    #[command(flatten)]
    paging: PageArgs,
}

/// Arguments for `signup`. Email and password come from the environment.
#[derive(clap::Args)]
struct SignupArgs {
    /// Given name.
    #[arg(long, required = true)]
    first_name: String,
    /// Family name.
    #[arg(long, required = true)]
    last_name: String,
}

/// One line of list output.
trait ListRow {
    /// Tab-separated row.
    fn row(&self) -> String;
}

impl ListRow for Movie {
    fn row(&self) -> String {
        format!(
            "{}\t{}\t{}\t{:.1}",
            self.id,
            self.title,
            self.release_date.as_deref().filter(|d| !d.is_empty()).unwrap_or("-"),
            self.vote_average,
        )
    }
}

impl ListRow for TvShow {
    fn row(&self) -> String {
        format!(
            "{}\t{}\t{}\t{:.1}",
            self.id,
            self.name,
            self.first_air_date.as_deref().filter(|d| !d.is_empty()).unwrap_or("-"),
            self.vote_average,
        )
    }
}

impl ListRow for TrendingItem {
    fn row(&self) -> String {
        match self {
            Self::Movie(m) => format!("movie\t{}", m.row()),
            Self::Tv(t) => format!("tv\t{}", t.row()),
            Self::Other => String::from("other\t-"),
        }
    }
}

/// Everything a command needs, built from config and environment.
struct App {
    config: AppConfig,
}

impl App {
    /// Loads config from `dir` (or the default location) plus env overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    fn load(dir: Option<&PathBuf>) -> Result<Self> {
        let env = |key: &str| std::env::var(key).ok();
        let path = resolve_config_path(dir, env)?;
        let config = AppConfig::load(&path)?.with_env_overrides(env);
        Ok(Self { config })
    }

    /// Builds the cached TMDB service.
    ///
    /// # Errors
    ///
    /// Returns an error if `TMDB_API_KEY` is not set, the base URL is invalid,
    /// or the client fails to build.
    #[instrument(skip_all)]
    fn tmdb_service(&self) -> Result<TmdbService<TmdbClient>> {
        let api_key = std::env::var("TMDB_API_KEY")
            .context("TMDB_API_KEY environment variable is required")?;
        let tmdb = &self.config.tmdb;

        let mut builder = TmdbClient::builder().api_key(api_key).user_agent(USER_AGENT);
        if let Some(base_url) = &tmdb.base_url {
            let url = Url::parse(base_url)
                .with_context(|| format!("invalid TMDB base URL: {base_url}"))?;
            builder = builder.base_url(url);
        }
        if let Some(timeout) = tmdb.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("failed to build TMDB client")?;

        let cache = Arc::new(TtlCache::new(tmdb.cache_ttl()));
        let service = TmdbService::new(client, cache);
        Ok(match &tmdb.language {
            Some(language) => service.with_language(language),
            None => service,
        })
    }

    /// Image URL builder for the configured CDN.
    fn images(&self) -> ImageUrls {
        self.config
            .tmdb
            .image_base_url
            .as_deref()
            .map_or_else(ImageUrls::default, ImageUrls::new)
    }

    /// Builds the Firebase provider from config and `FIREBASE_API_KEY`.
    fn firebase(&self) -> Result<FirebaseIdentityProvider> {
        let api_key = std::env::var("FIREBASE_API_KEY")
            .context("FIREBASE_API_KEY environment variable is required")?;
        let mut builder = FirebaseIdentityProvider::builder()
            .api_key(api_key)
            .user_agent(USER_AGENT);
        if let Some(base_url) = &self.config.auth.firebase_base_url {
            let url = Url::parse(base_url)
                .with_context(|| format!("invalid Firebase base URL: {base_url}"))?;
            builder = builder.base_url(url);
        }
        if let Some(timeout) = self.config.tmdb.timeout() {
            builder = builder.timeout(timeout);
        }
        builder.build().context("failed to build Firebase provider")
    }

    /// Signs in with the configured provider.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials are missing or the provider rejects them.
    #[instrument(skip_all)]
    async fn sign_in(&self) -> Result<Session> {
        match self.config.auth.provider {
            ProviderKind::Demo => sign_in_with(&DemoIdentityProvider, &demo_credentials()).await,
            ProviderKind::Firebase => {
                let credentials = env_credentials()?;
                sign_in_with(&self.firebase()?, &credentials).await
            }
        }
    }

    /// Refuses to continue when sign-in is required and fails.
    ///
    /// # Errors
    ///
    /// Returns an error if `[auth] required` is set and no session can be
    /// established.
    async fn gate(&self) -> Result<()> {
        if !self.config.auth.required {
            return Ok(());
        }
        let session = self.sign_in().await.context("sign-in is required")?;
        ensure!(session.is_allowed(), "sign-in is required");
        tracing::debug!(user = session.display_name(), "signed in");
        Ok(())
    }
}

/// Signs in through any provider.
async fn sign_in_with(
    provider: &(impl LocalIdentityProvider + Sync),
    credentials: &Credentials,
) -> Result<Session> {
    match provider.sign_in(credentials).await {
        Ok(identity) => Ok(Session::signed_in(identity)),
        Err(IdentityError::InvalidCredentials) => Ok(Session::anonymous()),
        Err(err) => Err(err).context("sign-in failed"),
    }
}

/// Credentials from `CINESCOPE_EMAIL` / `CINESCOPE_PASSWORD`.
fn env_credentials() -> Result<Credentials> {
    Ok(Credentials {
        email: std::env::var("CINESCOPE_EMAIL")
            .context("CINESCOPE_EMAIL environment variable is required")?,
        password: std::env::var("CINESCOPE_PASSWORD")
            .context("CINESCOPE_PASSWORD environment variable is required")?,
    })
}

/// The demo provider ignores credentials; pass whatever is set.
fn demo_credentials() -> Credentials {
    Credentials {
        email: std::env::var("CINESCOPE_EMAIL").unwrap_or_default(),
        password: std::env::var("CINESCOPE_PASSWORD").unwrap_or_default(),
    }
}

/// Loads `paging.pages` pages into `slice`, the first replacing, the rest appended.
///
/// # Errors
///
/// Returns the slice's error message if a page fails. Loading stops at the
/// failed page.
async fn load_pages<T, F, Fut>(
    store: &mut ViewStore<T>,
    slice: SliceName,
    paging: PageArgs,
    fetch: F,
) -> Result<()>
where
    F: Fn(u32) -> Fut,
    Fut: Future<Output = Result<Paged<T>, CatalogError>>,
{
    let mut request = PageRequest::replace(paging.page);
    for _ in 0..paging.pages {
        let generation = store.slice_mut(slice).begin(request);
        match fetch(request.page).await {
            Ok(paged) => {
                let data = PageData {
                    page: paged.page,
                    items: paged.results,
                    total_pages: paged.total_pages,
                    total_results: paged.total_results,
                };
                store.slice_mut(slice).complete(generation, data);
            }
            Err(err) => {
                store.slice_mut(slice).fail(generation, err.to_string());
                break;
            }
        }

        let Some(next) = store.slice(slice).next_page_request() else {
            break;
        };
        request = next;
    }

    let state = store.slice(slice);
    if let Some(message) = state.last_error() {
        if let Some(retry) = state.retry_request() {
            let page = retry.page;
            tracing::warn!("page {page} failed; rerun with --page {page} to retry");
        }
        bail!("{message}");
    }
    Ok(())
}

/// Loads a detail view: the entity into `selected`, its ranked related titles
/// into the Recommendations slice.
///
/// # Errors
///
/// Returns the aggregation error after recording it on both.
async fn load_detail<D, R>(
    selected: &mut Selected<DetailView<D, R>>,
    store: &mut ViewStore<R>,
    fetch: impl Future<Output = Result<DetailView<D, R>, DetailError>>,
) -> Result<()> {
    let generation = selected.begin();
    let related = store.slice_mut(SliceName::Recommendations).begin(PageRequest::replace(1));

    match fetch.await {
        Ok(mut view) => {
            let items = std::mem::take(&mut view.related);
            let total = u32::try_from(items.len()).unwrap_or(u32::MAX);
            store.slice_mut(SliceName::Recommendations).complete(
                related,
                PageData {
                    page: 1,
                    items,
                    total_pages: 1,
                    total_results: total,
                },
            );
            selected.complete(generation, view);
            Ok(())
        }
        Err(err) => {
            let message = err.to_string();
            store
                .slice_mut(SliceName::Recommendations)
                .fail(related, message.as_str());
            selected.fail(generation, message);
            Err(err.into())
        }
    }
}

/// Logs every item of `slice` plus a summary line.
fn print_slice<T: ListRow>(store: &ViewStore<T>, slice: SliceName) {
    let state = store.slice(slice);
    for item in state.items() {
        tracing::info!("{}", item.row());
    }
    tracing::info!(
        "Page {}/{} ({} results total, {} shown)",
        state.page(),
        state.total_pages(),
        state.total_results(),
        state.items().len()
    );
}

/// Runs `movie <ID>`.
///
/// # Errors
///
/// Returns an error if the ID is invalid or a mandatory lookup fails.
#[instrument(skip_all)]
async fn run_movie(app: &App, args: &DetailArgs) -> Result<()> {
    app.gate().await?;
    let service = app.tmdb_service()?;
    let mut selected = Selected::new();
    let mut store = ViewStore::new();
    load_detail(&mut selected, &mut store, movie_detail_view(&service, &args.id)).await?;
    if let Some(view) = selected.value() {
        let related = store.slice(SliceName::Recommendations).items();
        print_movie(view, related, &app.images());
    }
    Ok(())
}

fn print_movie(view: &MovieView, related: &[Movie], images: &ImageUrls) {
    let d = &view.details;
    tracing::info!("{} ({})", d.title, d.release_date.as_deref().unwrap_or("-"));
    if let Some(tagline) = d.tagline.as_deref().filter(|t| !t.is_empty()) {
        tracing::info!("\"{tagline}\"");
    }
    tracing::info!(
        "Runtime: {} min\tRating: {:.1} ({} votes)",
        d.runtime.map_or_else(|| String::from("-"), |r| r.to_string()),
        d.vote_average,
        d.vote_count
    );
    tracing::info!(
        "Genres: {}",
        d.genres.iter().map(|g| g.name.as_str()).collect::<Vec<_>>().join(", ")
    );
    tracing::info!("Poster: {}", images.poster_url(d.poster_path.as_deref()));
    tracing::info!("Backdrop: {}", images.backdrop_url(d.backdrop_path.as_deref()));
    if let Some(overview) = d.overview.as_deref() {
        tracing::info!("{overview}");
    }
    print_common(view.cast.as_slice(), view.trailer.as_ref(), images);
    tracing::info!("Related:");
    for movie in related {
        tracing::info!("  {}", movie.row());
    }
}

/// Runs `tv <ID>`.
///
/// # Errors
///
/// Returns an error if the ID is invalid or a mandatory lookup fails.
#[instrument(skip_all)]
async fn run_tv(app: &App, args: &DetailArgs) -> Result<()> {
    app.gate().await?;
    let service = app.tmdb_service()?;
    let mut selected = Selected::new();
    let mut store = ViewStore::new();
    load_detail(&mut selected, &mut store, tv_show_detail_view(&service, &args.id)).await?;
    if let Some(view) = selected.value() {
        let related = store.slice(SliceName::Recommendations).items();
        print_tv(view, related, &app.images());
    }
    Ok(())
}

fn print_tv(view: &TvShowView, related: &[TvShow], images: &ImageUrls) {
    let d = &view.details;
    tracing::info!("{} ({})", d.name, d.first_air_date.as_deref().unwrap_or("-"));
    tracing::info!(
        "Status: {}\tSeasons: {}\tEpisodes: {}\tRating: {:.1}",
        d.status.as_deref().unwrap_or("-"),
        d.number_of_seasons,
        d.number_of_episodes,
        d.vote_average
    );
    if !d.created_by.is_empty() {
        tracing::info!(
            "Created by: {}",
            d.created_by.iter().map(|c| c.name.as_str()).collect::<Vec<_>>().join(", ")
        );
    }
    tracing::info!("Poster: {}", images.poster_url(d.poster_path.as_deref()));
    if let Some(overview) = d.overview.as_deref() {
        tracing::info!("{overview}");
    }
    for season in &d.seasons {
        tracing::info!(
            "  {}: {} episodes (air_date: {})",
            season.name,
            season.episode_count,
            season.air_date.as_deref().unwrap_or("-")
        );
    }
    print_common(view.cast.as_slice(), view.trailer.as_ref(), images);
    tracing::info!("Related:");
    for show in related {
        tracing::info!("  {}", show.row());
    }
}

fn print_common(cast: &[CastMember], trailer: Option<&Video>, images: &ImageUrls) {
    tracing::info!("Cast:");
    for member in cast {
        tracing::info!(
            "  {} as {}\t{}",
            member.name,
            member.character.as_deref().unwrap_or("-"),
            images.profile_url(member.profile_path.as_deref())
        );
    }
    match trailer {
        Some(video) => tracing::info!("Trailer: https://www.youtube.com/watch?v={}", video.key),
        None => tracing::info!("Trailer: -"),
    }
}

/// Runs `movies <LIST>`.
///
/// # Errors
///
/// Returns an error if any requested page fails to load.
#[instrument(skip_all)]
async fn run_movies(app: &App, args: &MovieListArgs) -> Result<()> {
    app.gate().await?;
    let service = app.tmdb_service()?;
    let service = &service;
    let mut store = ViewStore::new();
    let list = args.list;
    load_pages(&mut store, SliceName::Browse, args.paging, move |page| async move {
        match list {
            MovieList::Popular => service.popular_movies(page).await,
            MovieList::TopRated => service.top_rated_movies(page).await,
            MovieList::NowPlaying => service.now_playing_movies(page).await,
            MovieList::Upcoming => service.upcoming_movies(page).await,
            MovieList::Trending => service.trending_movies(page).await,
        }
    })
    .await?;
    print_slice(&store, SliceName::Browse);
    Ok(())
}

/// Runs `tv-shows <LIST>`.
///
/// # Errors
///
/// Returns an error if any requested page fails to load.
#[instrument(skip_all)]
async fn run_tv_shows(app: &App, args: &TvListArgs) -> Result<()> {
    app.gate().await?;
    let service = app.tmdb_service()?;
    let service = &service;
    let mut store = ViewStore::new();
    let list = args.list;
    load_pages(&mut store, SliceName::Browse, args.paging, move |page| async move {
        match list {
            TvList::Popular => service.popular_tv_shows(page).await,
            TvList::TopRated => service.top_rated_tv_shows(page).await,
            TvList::OnAir => service.on_air_tv_shows(page).await,
            TvList::Trending => service.trending_tv_shows(page).await,
        }
    })
    .await?;
    print_slice(&store, SliceName::Browse);
    Ok(())
}

/// Runs `trending-all`.
///
/// # Errors
///
/// Returns an error if any requested page fails to load.
#[instrument(skip_all)]
async fn run_trending_all(app: &App, paging: PageArgs) -> Result<()> {
    app.gate().await?;
    let service = app.tmdb_service()?;
    let service = &service;
    let mut store = ViewStore::new();
    load_pages(&mut store, SliceName::Browse, paging, move |page| {
        service.trending_all(page)
    })
    .await?;
    print_slice(&store, SliceName::Browse);
    Ok(())
}

/// Runs `genres`.
///
/// # Errors
///
/// Returns an error if the genre list cannot be loaded.
#[instrument(skip_all)]
async fn run_genres(app: &App) -> Result<()> {
    app.gate().await?;
    let service = app.tmdb_service()?;
    let list = service
        .movie_genres()
        .await
        .context("failed to load genres")?;
    tracing::info!("ID\tName");
    for genre in &list.genres {
        tracing::info!("{}\t{}", genre.id, genre.name);
    }
    Ok(())
}

/// Runs `genre <ID>`.
///
/// # Errors
///
/// Returns an error if any requested page fails to load.
#[instrument(skip_all)]
async fn run_genre(app: &App, args: &GenreArgs) -> Result<()> {
    app.gate().await?;
    let service = app.tmdb_service()?;
    let service = &service;
    let mut store = ViewStore::new();
    let genre_id = args.id;
    load_pages(&mut store, SliceName::Browse, args.paging, move |page| {
        service.movies_by_genre(genre_id, page)
    })
    .await?;
    print_slice(&store, SliceName::Browse);
    Ok(())
}

/// Runs `search <KIND> --query Q`.
///
/// # Errors
///
/// Returns an error if the query is blank or any requested page fails.
#[instrument(skip_all)]
async fn run_search(app: &App, args: &SearchArgs) -> Result<()> {
    app.gate().await?;
    let service = app.tmdb_service()?;
    let service = &service;
    match args.kind {
        SearchKind::Movie => {
            let mut store = ViewStore::<Movie>::new();
            store.set_search_query(args.query.as_str());
            let query = store.search_query().to_owned();
            let query = query.as_str();
            load_pages(&mut store, SliceName::Search, args.paging, move |page| {
                service.search_movies(query, page)
            })
            .await?;
            tracing::info!("Results for \"{}\":", store.search_query());
            print_slice(&store, SliceName::Search);
        }
        SearchKind::Tv => {
            let mut store = ViewStore::<TvShow>::new();
            store.set_search_query(args.query.as_str());
            let query = store.search_query().to_owned();
            let query = query.as_str();
            load_pages(&mut store, SliceName::Search, args.paging, move |page| {
                service.search_tv_shows(query, page)
            })
            .await?;
            tracing::info!("Results for \"{}\":", store.search_query());
            print_slice(&store, SliceName::Search);
        }
    }
    Ok(())
}

/// Runs `whoami`.
///
/// # Errors
///
/// Returns an error if the provider cannot be reached or credentials are missing.
#[instrument(skip_all)]
async fn run_whoami(app: &App) -> Result<()> {
    let session = app.sign_in().await?;
    match session.identity() {
        Some(identity) => {
            tracing::info!("Signed in as {}", session.display_name());
            tracing::info!("UID: {}", identity.uid);
            tracing::info!("Email: {}", identity.email.as_deref().unwrap_or("-"));
        }
        None => tracing::info!("Not signed in (invalid email or password)"),
    }
    Ok(())
}

/// Runs `signup`.
///
/// # Errors
///
/// Returns an error if credentials are missing or the provider refuses the account.
#[instrument(skip_all)]
async fn run_signup(app: &App, args: &SignupArgs) -> Result<()> {
    let request = SignUpRequest {
        credentials: match app.config.auth.provider {
            ProviderKind::Demo => demo_credentials(),
            ProviderKind::Firebase => env_credentials()?,
        },
        first_name: args.first_name.clone(),
        last_name: args.last_name.clone(),
    };
    let identity = match app.config.auth.provider {
        ProviderKind::Demo => DemoIdentityProvider.sign_up(&request).await,
        ProviderKind::Firebase => app.firebase()?.sign_up(&request).await,
    }
    .context("sign-up failed")?;

    let session = Session::signed_in(identity);
    tracing::info!("Created account for {}", session.display_name());
    Ok(())
}

/// Flushes exported telemetry on drop.
#[derive(Default)]
struct TelemetryGuard {
    #[cfg(feature = "otel")]
    meter_provider: Option<opentelemetry_sdk::metrics::SdkMeterProvider>,
}

#[cfg(feature = "otel")]
impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.meter_provider.take()
            && let Err(err) = provider.shutdown()
        {
            tracing::debug!("failed to flush metrics: {err}");
        }
    }
}

/// Installs the fmt subscriber.
#[cfg(not(feature = "otel"))]
fn init_tracing() -> TelemetryGuard {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();
    TelemetryGuard::default()
}

/// Installs the fmt subscriber plus OTLP trace and metric exporters when
/// `OTEL_EXPORTER_OTLP_ENDPOINT` is set.
#[cfg(feature = "otel")]
fn init_tracing() -> TelemetryGuard {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    let endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok();

    let otel_layer = endpoint.as_ref().and_then(|_| {
        let exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_http()
            .build()
            .ok()?;

        let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
            .with_simple_exporter(exporter)
            .build();

        let tracer =
            opentelemetry::trace::TracerProvider::tracer(&tracer_provider, env!("CARGO_PKG_NAME"));
        opentelemetry::global::set_tracer_provider(tracer_provider);

        Some(tracing_opentelemetry::layer().with_tracer(tracer))
    });

    // Cache hit/miss counters from cinescope-api export through this provider.
    let meter_provider = endpoint.as_ref().and_then(|_| {
        let exporter = opentelemetry_otlp::MetricExporter::builder()
            .with_http()
            .build()
            .ok()?;
        let provider = opentelemetry_sdk::metrics::SdkMeterProvider::builder()
            .with_periodic_exporter(exporter)
            .build();
        opentelemetry::global::set_meter_provider(provider.clone());
        Some(provider)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(otel_layer)
        .init();

    TelemetryGuard { meter_provider }
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let _telemetry = init_tracing();

    let cli = Cli::parse();
    let app = App::load(cli.dir.as_ref())?;
    match cli.command {
        Commands::Movie(args) => run_movie(&app, &args).await,
        Commands::Tv(args) => run_tv(&app, &args).await,
        Commands::Movies(args) => run_movies(&app, &args).await,
        Commands::TvShows(args) => run_tv_shows(&app, &args).await,
        Commands::TrendingAll(paging) => run_trending_all(&app, paging).await,
        Commands::Genres => run_genres(&app).await,
        Commands::Genre(args) => run_genre(&app, &args).await,
        Commands::Search(args) => run_search(&app, &args).await,
        Commands::Whoami => run_whoami(&app).await,
        Commands::Signup(args) => run_signup(&app, &args).await,
    }
}
