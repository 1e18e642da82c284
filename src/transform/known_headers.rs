//! Public headers of the React Native core framework, without the `.h` suffix.

pub const REACT_HEADERS: &[&str] = &[
    "RCTAccessibilityManager",
    "RCTActivityIndicatorView",
    "RCTActivityIndicatorViewManager",
    "RCTAlertManager",
    "RCTAnimationType",
    "RCTAppearance",
    "RCTAppState",
    "RCTAssert",
    "RCTAutoInsetsProtocol",
    "RCTBaseTextInputView",
    "RCTBlobManager",
    "RCTBorderStyle",
    "RCTBridge",
    "RCTBridge+Private",
    "RCTBridgeDelegate",
    "RCTBridgeMethod",
    "RCTBridgeModule",
    "RCTBridgeModuleDecorator",
    "RCTBundleURLProvider",
    "RCTClipboard",
    "RCTComponent",
    "RCTComponentData",
    "RCTComponentEvent",
    "RCTConstants",
    "RCTConvert",
    "RCTCxxBridgeDelegate",
    "RCTCxxModule",
    "RCTCxxUtils",
    "RCTDefines",
    "RCTDevLoadingViewProtocol",
    "RCTDevMenu",
    "RCTDevSettings",
    "RCTDeviceInfo",
    "RCTDisplayLink",
    "RCTErrorInfo",
    "RCTEventDispatcher",
    "RCTEventDispatcherProtocol",
    "RCTEventEmitter",
    "RCTExceptionsManager",
    "RCTFileReaderModule",
    "RCTFont",
    "RCTFrameUpdate",
    "RCTHTTPRequestHandler",
    "RCTI18nUtil",
    "RCTImageLoader",
    "RCTImageLoaderProtocol",
    "RCTImageSource",
    "RCTImageURLLoader",
    "RCTImageView",
    "RCTInitializing",
    "RCTInvalidating",
    "RCTJSStackFrame",
    "RCTJavaScriptExecutor",
    "RCTJavaScriptLoader",
    "RCTKeyCommands",
    "RCTLayout",
    "RCTLayoutAnimation",
    "RCTLinkingManager",
    "RCTLocalizedString",
    "RCTLog",
    "RCTManagedPointer",
    "RCTModalHostView",
    "RCTModalHostViewManager",
    "RCTModuleData",
    "RCTModuleMethod",
    "RCTMultipartStreamReader",
    "RCTNetworking",
    "RCTNullability",
    "RCTParserUtils",
    "RCTPerformanceLogger",
    "RCTPlatform",
    "RCTPointerEvents",
    "RCTProfile",
    "RCTRedBox",
    "RCTRefreshControl",
    "RCTReloadCommand",
    "RCTRootContentView",
    "RCTRootShadowView",
    "RCTRootView",
    "RCTRootViewDelegate",
    "RCTSafeAreaView",
    "RCTScrollView",
    "RCTScrollableProtocol",
    "RCTSettingsManager",
    "RCTShadowView",
    "RCTSourceCode",
    "RCTStatusBarManager",
    "RCTSurface",
    "RCTSurfaceDelegate",
    "RCTSurfaceHostingView",
    "RCTSurfacePresenterStub",
    "RCTSurfaceProtocol",
    "RCTSurfaceStage",
    "RCTSurfaceView",
    "RCTSwitch",
    "RCTTextDecorationLineType",
    "RCTTiming",
    "RCTTouchHandler",
    "RCTUIManager",
    "RCTUIManagerObserverCoordinator",
    "RCTUIManagerUtils",
    "RCTUIUtils",
    "RCTURLRequestHandler",
    "RCTUtils",
    "RCTVersion",
    "RCTView",
    "RCTViewManager",
    "RCTViewUtils",
    "RCTWeakProxy",
    "RCTWrapperViewController",
];
