//! # 常用接口模块
//!
//! 目前只承载单元测试用的断言宏
