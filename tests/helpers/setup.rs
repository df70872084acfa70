use chime_api::Application;
use chime_domain::QuotaLimits;
use chime_infra::{ChimeContext, Config};
use chime_sdk::{ChimeSDK, CreateUserInput};

pub struct TestApp {
    pub config: Config,
    pub address: String,
}

impl TestApp {
    /// Creates a user and returns an SDK authenticated as that user
    pub async fn create_user(&self, username: &str, premium: bool) -> ChimeSDK {
        let res = ChimeSDK::anonymous(self.address.clone())
            .user
            .create(CreateUserInput {
                code: self.config.create_user_secret_code.clone(),
                username: username.into(),
                premium,
            })
            .await
            .expect("Expected to create user");
        ChimeSDK::new(self.address.clone(), res.secret_api_key)
    }
}

// Launch the application as a background task
pub async fn spawn_app() -> (TestApp, ChimeSDK) {
    let mut ctx = ChimeContext::create_inmemory();
    ctx.config.port = 0; // Random port
    ctx.config
        .quota
        .rules
        .insert("createReminder".into(), QuotaLimits::new(3, 60));

    let config = ctx.config.clone();
    let application = Application::new(ctx)
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}/api/v1", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    let app = TestApp { config, address };
    let sdk = ChimeSDK::anonymous(app.address.clone());
    (app, sdk)
}
