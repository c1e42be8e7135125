use crate::knn::Unit;
use crate::protocol::Frame;

/// 参数解析工具
pub struct ArgumentParser<'a> {
    args: &'a [Frame],
    command_name: &'static str,
}

/// Parsed arguments of the FIND command.
#[derive(Debug, Clone, PartialEq)]
pub struct FindArgs {
    pub latitude: f64,
    pub longitude: f64,
    pub k: usize,
    /// None means "use the server's configured default unit".
    pub unit: Option<Unit>,
}

impl<'a> ArgumentParser<'a> {
    pub fn new(args: &'a [Frame], command_name: &'static str) -> Self {
        Self { args, command_name }
    }

    /// 获取字符串参数
    pub fn get_string(&self, index: usize, param_name: &str) -> std::result::Result<&str, String> {
        match self.args.get(index) {
            Some(Frame::Bulk(Some(s))) => Ok(s),
            Some(_) => Err(format!("ERR invalid {}: expected string", param_name)),
            None => Err(format!("ERR missing {} parameter", param_name)),
        }
    }

    /// 获取浮点数参数
    pub fn get_f64(&self, index: usize, param_name: &str) -> std::result::Result<f64, String> {
        let raw = self.get_string(index, param_name)?;
        raw.parse::<f64>()
            .map_err(|_| format!("ERR invalid {}: expected number, got '{}'", param_name, raw))
    }

    /// 获取整数参数
    pub fn get_usize(&self, index: usize, param_name: &str) -> std::result::Result<usize, String> {
        let raw = self.get_string(index, param_name)?;
        raw.parse::<usize>()
            .map_err(|_| format!("ERR invalid {}: expected positive integer", param_name))
    }

    /// 验证固定位置上的关键字
    fn expect_keyword(&self, index: usize, keyword: &str) -> std::result::Result<(), String> {
        let word = self.get_string(index, keyword)?;
        if word.to_uppercase() != keyword {
            return Err(format!(
                "ERR invalid syntax: expected '{}', got '{}'",
                keyword, word
            ));
        }
        Ok(())
    }

    /// 解析 FIND 命令的参数
    /// 语法: FIND POINT lat lon COUNT k [UNIT miles|km]
    ///
    /// # Examples
    ///
    /// ```ignore
    /// FIND POINT 34.098942 -118.323040 COUNT 10
    /// FIND POINT 34.098942 -118.323040 COUNT 10 UNIT km
    /// ```
    pub fn parse_find_args(&self) -> std::result::Result<FindArgs, String> {
        if self.args.len() < 5 {
            return Err(format!(
                "ERR wrong number of arguments for '{}' command. Expected at least 5, got {}. Usage: FIND POINT lat lon COUNT k [UNIT miles|km]",
                self.command_name,
                self.args.len()
            ));
        }

        self.expect_keyword(0, "POINT")?;

        let latitude = self.get_f64(1, "latitude")?;
        let longitude = self.get_f64(2, "longitude")?;

        // 验证经纬度范围
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(format!(
                "ERR invalid latitude: must be between -90 and 90, got {}",
                latitude
            ));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(format!(
                "ERR invalid longitude: must be between -180 and 180, got {}",
                longitude
            ));
        }

        self.expect_keyword(3, "COUNT")?;

        let k = self.get_usize(4, "count")?;
        if k == 0 {
            return Err("ERR count must be greater than 0".to_string());
        }

        // 可选的 UNIT 子句
        let unit = match self.args.len() {
            5 => None,
            7 => {
                self.expect_keyword(5, "UNIT")?;
                let raw = self.get_string(6, "unit")?;
                Some(
                    raw.parse::<Unit>()
                        .map_err(|_| format!("ERR unknown unit '{}': expected miles or km", raw))?,
                )
            }
            n => {
                return Err(format!(
                    "ERR wrong number of arguments for '{}' command. Expected 5 or 7, got {}",
                    self.command_name, n
                ))
            }
        };

        Ok(FindArgs {
            latitude,
            longitude,
            k,
            unit,
        })
    }
}
