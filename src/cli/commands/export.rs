use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::db::store::AlarmStore;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::models::alarm::CategoryKind;
use crate::ui::messages::info;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        standard,
        observances,
        force,
    } = cmd
    {
        let kinds: Vec<CategoryKind> = if *standard {
            vec![CategoryKind::Standard]
        } else if *observances {
            vec![CategoryKind::Observance]
        } else {
            CategoryKind::ALL.to_vec()
        };

        let pool = DbPool::new(&cfg.database)?;
        let mut store = AlarmStore::new(pool, &cfg.default_sound);
        let count = ExportLogic::export(&mut store, *format, file, &kinds, cfg.locale(), *force)?;

        if count > 0 {
            info(format!("{} alarm(s) written as {}", count, format.as_str()));
        }
    }
    Ok(())
}
